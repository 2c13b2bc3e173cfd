//! Request auth helpers for HTTP tests.
//!
//! A session token can travel either as the `session` cookie or as an
//! `Authorization: Bearer` header; `MockAuth` builds both forms.

use axum::http::{HeaderName, HeaderValue, header};

use techteam_auth_types::cookie::SESSION_COOKIE;

/// A session token presented by a test client.
pub struct MockAuth {
    pub token: String,
}

impl MockAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// `Authorization: Bearer <token>`.
    pub fn bearer(&self) -> (HeaderName, HeaderValue) {
        (
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.token)).unwrap(),
        )
    }

    /// `Cookie: session=<token>`.
    pub fn cookie(&self) -> (HeaderName, HeaderValue) {
        (
            header::COOKIE,
            HeaderValue::from_str(&format!("{SESSION_COOKIE}={}", self.token)).unwrap(),
        )
    }
}
