use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};

use crate::{error::AppError, models::SessionContext};

use super::AppState;

/// Client opted into browsing without an account
pub const GUEST_MODE_HEADER: &str = "x-guest-mode";
/// Where the client wants to land after signing in
pub const REDIRECT_HEADER: &str = "x-post-login-redirect";

/// Resolves the caller from `Authorization: Bearer <id token>`.
///
/// Missing, unknown or expired tokens yield a guest session; only a failing auth backend rejects
/// the request.
#[axum::async_trait]
impl FromRequestParts<AppState> for SessionContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let redirect = header_str(&parts.headers, REDIRECT_HEADER);

        if is_guest_mode(&parts.headers) {
            return Ok(SessionContext::guest().with_pending_redirect(redirect));
        }

        let Some(token) = bearer_token(&parts.headers) else {
            return Ok(SessionContext::guest().with_pending_redirect(redirect));
        };

        let session = match state.auth.current_user_id(token).await? {
            Some(user_id) => SessionContext::authenticated(user_id, token),
            None => {
                tracing::debug!("Unknown or expired token, treating caller as guest");
                SessionContext::guest()
            }
        };
        Ok(session.with_pending_redirect(redirect))
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn is_guest_mode(headers: &HeaderMap) -> bool {
    matches!(header_str(headers, GUEST_MODE_HEADER), Some("1" | "true"))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    header_str(headers, AUTHORIZATION.as_str())?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
