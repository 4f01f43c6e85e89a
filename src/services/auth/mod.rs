/// Authentication abstraction
///
/// Accounts live in a hosted identity service. Screens that need an account (favorites, profile)
/// resolve the caller through `AuthClient`; the catalog never does.
use serde::Serialize;

use crate::error::AppResult;

pub mod identity_toolkit;
pub mod memory;

pub use identity_toolkit::IdentityToolkitAuth;
pub use memory::MemoryAuth;

/// A signed-in account and the token that proves it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub user_id: String,
    pub email: String,
    pub id_token: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait AuthClient: Send + Sync {
    /// Creates an account and signs it in
    async fn sign_up(&self, email: &str, password: &str) -> AppResult<AuthSession>;

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthSession>;

    /// Ends the session behind `id_token`
    async fn sign_out(&self, id_token: &str) -> AppResult<()>;

    /// The account behind `id_token`, `None` if the token is unknown or expired
    async fn current_user_id(&self, id_token: &str) -> AppResult<Option<String>>;

    /// Permanently removes the account behind `id_token`
    async fn delete_account(&self, id_token: &str) -> AppResult<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}
