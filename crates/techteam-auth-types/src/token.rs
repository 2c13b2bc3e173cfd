//! Raw session-token extractor.

use axum::extract::FromRequestParts;
use axum_extra::extract::CookieJar;
use http::request::Parts;
use http::{HeaderMap, StatusCode, header::AUTHORIZATION};

use crate::cookie::SESSION_COOKIE;

/// The bearer secret presented by the client, unvalidated.
///
/// Read from the `session` cookie first, then from `Authorization: Bearer`.
/// Rejects with 401 when neither carries a non-empty value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(pub String);

impl SessionToken {
    fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let jar = CookieJar::from_headers(headers);
        if let Some(cookie) = jar.get(SESSION_COOKIE) {
            if !cookie.value().is_empty() {
                return Some(Self(cookie.value().to_owned()));
            }
        }
        bearer_token(headers).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_owned())
}

impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // axum-core 0.5 defines this as `fn -> impl Future + Send`; read the
    // headers synchronously and return a 'static future.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = Self::from_headers(&parts.headers);
        async move { token.ok_or(StatusCode::UNAUTHORIZED) }
    }
}
