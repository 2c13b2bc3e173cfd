//! Request authentication and the role / tenant gates built on it.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use techteam_auth_types::context::AuthContext;
use techteam_auth_types::token::SessionToken;
use techteam_domain::user::UserRole;

use crate::domain::types::User;
use crate::error::ApiError;
use crate::state::AppState;
use crate::usecase::session::ValidateSessionUseCase;

pub const SUPER_ADMIN: &[UserRole] = &[UserRole::SuperAdmin];
pub const STAFF: &[UserRole] = &[UserRole::Admin, UserRole::SuperAdmin];
pub const SELF_SERVICE: &[UserRole] = &[UserRole::Student, UserRole::Admin];

/// A caller holding a valid session for an active user.
///
/// Extracting it runs the full session check; any failure is a 401.
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub ctx: AuthContext,
    pub user: User,
}

impl Authenticated {
    pub fn require_role(&self, allowed: &[UserRole]) -> Result<(), ApiError> {
        Ok(self.ctx.require_role(allowed)?)
    }

    /// The school in the route, once the caller is allowed to act on it.
    pub fn school(&self, school_id: Uuid) -> Result<Uuid, ApiError> {
        Ok(self.ctx.require_school(Some(school_id))?)
    }

    /// Role check followed by the school check.
    pub fn school_as(&self, allowed: &[UserRole], school_id: Uuid) -> Result<Uuid, ApiError> {
        self.require_role(allowed)?;
        self.school(school_id)
    }

    /// The caller's own school for `/api/student/*` routes.
    pub fn own_school(&self) -> Result<Uuid, ApiError> {
        self.require_role(SELF_SERVICE)?;
        Ok(self.ctx.own_school()?)
    }
}

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let state = state.clone();
        async move {
            let token = SessionToken::from_request_parts(parts, &state)
                .await
                .map_err(|_| ApiError::Unauthorized)?;
            let usecase = ValidateSessionUseCase {
                sessions: state.session_repo(),
                users: state.user_repo(),
            };
            let (session, user) = usecase.execute(token.as_str()).await?;
            let ctx = AuthContext {
                user_id: user.id,
                session_id: session.id,
                role: user.role,
                school_id: user.school_id,
            };
            Ok(Self { ctx, user })
        }
    }
}
