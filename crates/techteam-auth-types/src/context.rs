//! Authenticated caller identity and the role / tenant checks applied to it.

use uuid::Uuid;

use techteam_domain::user::UserRole;

/// Why an authenticated caller was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    #[error("forbidden")]
    Forbidden,
    #[error("school context required")]
    MissingSchoolContext,
}

/// Identity of the caller for one request, built from a validated session.
///
/// Passed explicitly into usecases instead of living on the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub session_id: Uuid,
    pub role: UserRole,
    /// `None` only for super admins.
    pub school_id: Option<Uuid>,
}

impl AuthContext {
    /// Refuse with `Forbidden` unless the caller's role is in `allowed`.
    pub fn require_role(&self, allowed: &[UserRole]) -> Result<(), AccessError> {
        if allowed.contains(&self.role) {
            return Ok(());
        }
        tracing::warn!(
            user_id = %self.user_id,
            role = %self.role,
            "role not permitted"
        );
        Err(AccessError::Forbidden)
    }

    /// Check the caller may act on `school_id`.
    ///
    /// Super admins may act on any school. Everyone else must belong to it.
    /// A missing target school is `MissingSchoolContext`.
    pub fn require_school(&self, school_id: Option<Uuid>) -> Result<Uuid, AccessError> {
        let target = school_id.ok_or(AccessError::MissingSchoolContext)?;
        if self.role == UserRole::SuperAdmin || self.school_id == Some(target) {
            return Ok(target);
        }
        tracing::warn!(
            user_id = %self.user_id,
            school_id = %target,
            "cross-school access denied"
        );
        Err(AccessError::Forbidden)
    }

    /// The caller's own school. Users without one (super admins) are refused.
    pub fn own_school(&self) -> Result<Uuid, AccessError> {
        self.school_id.ok_or(AccessError::Forbidden)
    }
}
