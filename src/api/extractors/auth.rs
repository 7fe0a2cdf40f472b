use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::Span;

use crate::error::AppError;

/// Acting staff user, injected by the upstream identity gateway. Role-based
/// authorization happens there; the handlers only enforce state guards.
pub struct AuthUser {
    pub id: String,
    pub role: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get("X-User-Id")
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .ok_or(AppError::Unauthorized)?
            .to_string();

        let role = parts
            .headers
            .get("X-User-Role")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("STAFF")
            .to_string();

        let span = Span::current();
        span.record("user_id", id.as_str());
        span.record("user_role", role.as_str());

        Ok(AuthUser { id, role })
    }
}
