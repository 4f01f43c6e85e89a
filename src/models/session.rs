use serde::Serialize;

use crate::error::{AppError, AppResult};

/// Who is making a request, and where to send them after signing in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    pub user_id: Option<String>,
    #[serde(skip)]
    pub id_token: Option<String>,
    pub is_guest: bool,
    pub pending_redirect: Option<String>,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::guest()
    }
}

impl SessionContext {
    pub fn guest() -> Self {
        Self {
            user_id: None,
            id_token: None,
            is_guest: true,
            pending_redirect: None,
        }
    }

    pub fn authenticated(user_id: impl Into<String>, id_token: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            id_token: Some(id_token.into()),
            is_guest: false,
            pending_redirect: None,
        }
    }

    /// Records where the client wants to resume; unsafe targets are dropped
    pub fn with_pending_redirect(mut self, path: Option<&str>) -> Self {
        self.pending_redirect = path.and_then(sanitize_redirect);
        self
    }

    /// The signed-in user's id, or `AuthRequired` carrying the resume target
    pub fn require_user(&self) -> AppResult<&str> {
        match (&self.user_id, self.is_guest) {
            (Some(uid), false) => Ok(uid.as_str()),
            _ => Err(AppError::AuthRequired {
                redirect: self.pending_redirect.clone(),
            }),
        }
    }

    /// The signed-in user's id token
    pub fn require_token(&self) -> AppResult<&str> {
        self.require_user()?;
        self.id_token.as_deref().ok_or(AppError::AuthRequired {
            redirect: self.pending_redirect.clone(),
        })
    }
}

/// Accepts only same-site absolute paths such as `/details?id=3`
pub fn sanitize_redirect(path: &str) -> Option<String> {
    let path = path.trim();
    let safe = path.starts_with('/')
        && !path.starts_with("//")
        && !path.contains('\\')
        && !path.contains("://");
    safe.then(|| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_requires_sign_in_with_redirect() {
        let session = SessionContext::guest().with_pending_redirect(Some("/details"));
        match session.require_user() {
            Err(AppError::AuthRequired { redirect }) => {
                assert_eq!(redirect.as_deref(), Some("/details"))
            }
            other => panic!("expected AuthRequired, got {:?}", other),
        }
    }

    #[test]
    fn test_authenticated_user() {
        let session = SessionContext::authenticated("uid-1", "token");
        assert_eq!(session.require_user().unwrap(), "uid-1");
        assert_eq!(session.require_token().unwrap(), "token");
        assert!(!session.is_guest);
    }

    #[test]
    fn test_sanitize_redirect() {
        assert_eq!(sanitize_redirect("/favorites"), Some("/favorites".to_string()));
        assert_eq!(sanitize_redirect("//evil.com"), None);
        assert_eq!(sanitize_redirect("https://evil.com"), None);
        assert_eq!(sanitize_redirect("/a\\b"), None);
        assert_eq!(sanitize_redirect("details"), None);
    }

    #[test]
    fn test_guest_session_serialization() {
        let json = serde_json::to_value(SessionContext::guest()).unwrap();
        assert_eq!(json["isGuest"], true);
        assert!(json.get("idToken").is_none());
    }
}
