use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    services::auth::{AuthClient, AuthSession},
};

struct Account {
    user_id: String,
    password: String,
}

#[derive(Default)]
struct Inner {
    /// email -> account
    accounts: HashMap<String, Account>,
    /// id token -> (user id, email)
    tokens: HashMap<String, (String, String)>,
}

/// In-process accounts with opaque bearer tokens
#[derive(Clone, Default)]
pub struct MemoryAuth {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    fn issue(inner: &mut Inner, user_id: &str, email: &str) -> AuthSession {
        let id_token = Uuid::new_v4().to_string();
        inner
            .tokens
            .insert(id_token.clone(), (user_id.to_string(), email.to_string()));
        AuthSession {
            user_id: user_id.to_string(),
            email: email.to_string(),
            id_token,
        }
    }
}

#[async_trait::async_trait]
impl AuthClient for MemoryAuth {
    async fn sign_up(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let email = email.trim().to_lowercase();
        let mut inner = self.inner.write().await;
        if inner.accounts.contains_key(&email) {
            return Err(AppError::InvalidInput("Email already in use".to_string()));
        }

        let user_id = Uuid::new_v4().simple().to_string();
        inner.accounts.insert(
            email.clone(),
            Account {
                user_id: user_id.clone(),
                password: password.to_string(),
            },
        );
        Ok(Self::issue(&mut inner, &user_id, &email))
    }

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let email = email.trim().to_lowercase();
        let mut inner = self.inner.write().await;
        let user_id = match inner.accounts.get(&email) {
            Some(account) if account.password == password => account.user_id.clone(),
            _ => {
                return Err(AppError::Unauthorized(
                    "Invalid email or password".to_string(),
                ))
            }
        };
        Ok(Self::issue(&mut inner, &user_id, &email))
    }

    async fn sign_out(&self, id_token: &str) -> AppResult<()> {
        self.inner.write().await.tokens.remove(id_token);
        Ok(())
    }

    async fn current_user_id(&self, id_token: &str) -> AppResult<Option<String>> {
        let inner = self.inner.read().await;
        Ok(inner.tokens.get(id_token).map(|(uid, _)| uid.clone()))
    }

    async fn delete_account(&self, id_token: &str) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        let (user_id, email) = inner
            .tokens
            .get(id_token)
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Unknown session".to_string()))?;

        inner.accounts.remove(&email);
        inner.tokens.retain(|_, (uid, _)| *uid != user_id);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
