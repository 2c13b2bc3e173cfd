use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use rand::RngExt;
use uuid::Uuid;

use techteam_auth_types::cookie::SESSION_TTL_SECS;

use crate::domain::repository::{PasswordHasher, SessionRepository, UserRepository};
use crate::domain::types::{MIN_PASSWORD_LEN, MIN_USERNAME_LEN, Session, User};
use crate::error::ApiError;

/// Bytes of entropy in a session token.
pub const SESSION_TOKEN_BYTES: usize = 32;

/// 32 random bytes, base64url without padding (43 chars).
pub fn generate_session_token() -> String {
    let bytes: [u8; SESSION_TOKEN_BYTES] = rand::rng().random();
    URL_SAFE_NO_PAD.encode(bytes)
}

pub fn session_ttl() -> Duration {
    Duration::seconds(SESSION_TTL_SECS)
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub username: String,
    pub password: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

pub struct LoginUseCase<U: UserRepository, S: SessionRepository, P: PasswordHasher> {
    pub users: U,
    pub sessions: S,
    pub hasher: P,
}

impl<U: UserRepository, S: SessionRepository, P: PasswordHasher> LoginUseCase<U, S, P> {
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, ApiError> {
        if input.username.chars().count() < MIN_USERNAME_LEN
            || input.password.chars().count() < MIN_PASSWORD_LEN
        {
            return Err(ApiError::validation("username or password is too short"));
        }

        let Some(user) = self.users.find_by_username(&input.username).await? else {
            tracing::warn!(username = %input.username, "login failed: unknown user");
            return Err(ApiError::Unauthorized);
        };
        if !user.is_active {
            tracing::warn!(username = %input.username, "login failed: inactive user");
            return Err(ApiError::Unauthorized);
        }
        if !self.hasher.verify(&input.password, &user.password_hash).await? {
            tracing::warn!(username = %input.username, "login failed: bad password");
            return Err(ApiError::Unauthorized);
        }

        let now = Utc::now();
        let session = Session {
            id: Uuid::now_v7(),
            user_id: user.id,
            token: generate_session_token(),
            ip_address: input.ip_address,
            user_agent: input.user_agent,
            created_at: now,
            expires_at: now + session_ttl(),
            revoked_at: None,
        };
        self.sessions.create(&session).await?;
        tracing::info!(user_id = %user.id, session_id = %session.id, "login succeeded");

        Ok(LoginOutput {
            token: session.token,
            expires_at: session.expires_at,
            user,
        })
    }
}

// ── ValidateSession ──────────────────────────────────────────────────────────

pub struct ValidateSessionUseCase<S: SessionRepository, U: UserRepository> {
    pub sessions: S,
    pub users: U,
}

impl<S: SessionRepository, U: UserRepository> ValidateSessionUseCase<S, U> {
    /// Resolve a bearer token to its session and active user. Every failure
    /// is the same `Unauthorized`.
    pub async fn execute(&self, token: &str) -> Result<(Session, User), ApiError> {
        let session = self
            .sessions
            .find_by_token(token)
            .await?
            .ok_or(ApiError::Unauthorized)?;
        if !session.is_valid_at(Utc::now()) {
            return Err(ApiError::Unauthorized);
        }
        let user = self
            .users
            .find_by_id(session.user_id)
            .await?
            .filter(|u| u.is_active)
            .ok_or(ApiError::Unauthorized)?;
        Ok((session, user))
    }
}

// ── Logout ───────────────────────────────────────────────────────────────────

pub struct LogoutUseCase<S: SessionRepository> {
    pub sessions: S,
}

impl<S: SessionRepository> LogoutUseCase<S> {
    pub async fn execute(&self, session_id: Uuid) -> Result<(), ApiError> {
        self.sessions.revoke(session_id, Utc::now()).await?;
        tracing::info!(session_id = %session_id, "session revoked");
        Ok(())
    }
}

// ── RevokeAllSessions ────────────────────────────────────────────────────────

pub struct RevokeAllSessionsUseCase<S: SessionRepository> {
    pub sessions: S,
}

impl<S: SessionRepository> RevokeAllSessionsUseCase<S> {
    pub async fn execute(&self, user_id: Uuid) -> Result<u64, ApiError> {
        let revoked = self.sessions.revoke_all_for_user(user_id, Utc::now()).await?;
        tracing::info!(user_id = %user_id, revoked, "all sessions revoked");
        Ok(revoked)
    }
}

// ── CleanupSessions ──────────────────────────────────────────────────────────

pub struct CleanupSessionsUseCase<S: SessionRepository> {
    pub sessions: S,
}

impl<S: SessionRepository> CleanupSessionsUseCase<S> {
    pub async fn execute(&self, now: DateTime<Utc>) -> Result<u64, ApiError> {
        let deleted = self.sessions.delete_expired(now).await?;
        tracing::info!(deleted, "expired sessions removed");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_generate_url_safe_token_of_256_bits() {
        let token = generate_session_token();
        assert_eq!(token.len(), 43);
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        let decoded = URL_SAFE_NO_PAD.decode(&token).unwrap();
        assert_eq!(decoded.len(), SESSION_TOKEN_BYTES);
    }

    #[test]
    fn should_generate_distinct_tokens() {
        assert_ne!(generate_session_token(), generate_session_token());
    }

    #[test]
    fn should_expire_sessions_after_twelve_hours() {
        assert_eq!(session_ttl(), Duration::hours(12));
    }
}
