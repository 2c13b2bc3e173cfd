use axum::{extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use techteam_auth_types::client::ClientInfo;
use techteam_auth_types::cookie::{clear_session_cookie, set_session_cookie};
use techteam_domain::user::{Avatar, UserRole};

use crate::access::Authenticated;
use crate::domain::types::User;
use crate::error::ApiError;
use crate::extract::Json;
use crate::state::AppState;
use crate::usecase::session::{LoginInput, LoginUseCase, LogoutUseCase, RevokeAllSessionsUseCase};

// ── Response types ───────────────────────────────────────────────────────────

/// Public view of an account. The password hash never leaves the service.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub school_id: Option<Uuid>,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: UserRole,
    pub points: i32,
    pub streak: i32,
    pub selected_avatar: Avatar,
    pub is_active: bool,
    #[serde(serialize_with = "techteam_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "techteam_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            school_id: user.school_id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            points: user.points,
            streak: user.streak,
            selected_avatar: user.selected_avatar,
            is_active: user.is_active,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// ── POST /api/auth/login ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    #[serde(serialize_with = "techteam_core::serde::to_rfc3339_ms")]
    pub expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

pub async fn login(
    State(state): State<AppState>,
    client: ClientInfo,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = LoginUseCase {
        users: state.user_repo(),
        sessions: state.session_repo(),
        hasher: state.hasher(),
    };
    let out = usecase
        .execute(LoginInput {
            username: body.username,
            password: body.password,
            ip_address: client.ip_address,
            user_agent: client.user_agent,
        })
        .await?;

    let jar = set_session_cookie(jar, out.token.clone(), state.cookie_secure);
    let body = LoginResponse {
        token: out.token,
        expires_at: out.expires_at,
        user: out.user.into(),
    };
    Ok((StatusCode::OK, jar, Json(body)))
}

// ── POST /api/auth/logout ────────────────────────────────────────────────────

pub async fn logout(
    State(state): State<AppState>,
    auth: Authenticated,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = LogoutUseCase {
        sessions: state.session_repo(),
    };
    usecase.execute(auth.ctx.session_id).await?;
    let jar = clear_session_cookie(jar, state.cookie_secure);
    Ok((StatusCode::OK, jar))
}

// ── POST /api/auth/logout-all ────────────────────────────────────────────────

#[derive(Serialize)]
pub struct LogoutAllResponse {
    pub revoked: u64,
}

pub async fn logout_all(
    State(state): State<AppState>,
    auth: Authenticated,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = RevokeAllSessionsUseCase {
        sessions: state.session_repo(),
    };
    let revoked = usecase.execute(auth.ctx.user_id).await?;
    let jar = clear_session_cookie(jar, state.cookie_secure);
    Ok((StatusCode::OK, jar, Json(LogoutAllResponse { revoked })))
}

// ── GET /api/auth/me ─────────────────────────────────────────────────────────

pub async fn me(auth: Authenticated) -> Json<UserResponse> {
    Json(auth.user.into())
}
