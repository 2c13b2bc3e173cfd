use anyhow::Context as _;

use crate::domain::repository::PasswordHasher;
use crate::error::ApiError;

/// bcrypt-backed password hashing. Work runs on the blocking pool so a slow
/// hash only holds up its own request.
#[derive(Clone, Copy)]
pub struct BcryptHasher {
    pub cost: u32,
}

impl PasswordHasher for BcryptHasher {
    async fn hash(&self, plaintext: &str) -> Result<String, ApiError> {
        let plaintext = plaintext.to_owned();
        let cost = self.cost;
        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
            .await
            .context("join password hash task")?
            .context("hash password")?;
        Ok(hash)
    }

    async fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, ApiError> {
        let plaintext = plaintext.to_owned();
        let hash = hash.to_owned();
        let matched = tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &hash))
            .await
            .context("join password verify task")?;
        match matched {
            Ok(matched) => Ok(matched),
            Err(e) => {
                tracing::warn!(error = %e, "stored password hash is malformed");
                Ok(false)
            }
        }
    }
}
