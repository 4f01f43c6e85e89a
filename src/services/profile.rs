use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value};

use crate::{
    error::{AppError, AppResult},
    models::{ProfileUpdate, SessionContext, SignUpForm, UserProfile, DEFAULT_AVATAR},
    services::{
        auth::{AuthClient, AuthSession},
        store::{DocumentStore, USERS},
    },
};

/// Account profiles: creation at sign-up, avatar/country edits and deletion
pub struct ProfileService {
    store: Arc<dyn DocumentStore>,
    auth: Arc<dyn AuthClient>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn DocumentStore>, auth: Arc<dyn AuthClient>) -> Self {
        Self { store, auth }
    }

    /// Validates the form, creates the account and writes its profile.
    ///
    /// If the profile cannot be written the new account is removed again.
    pub async fn sign_up(&self, form: &SignUpForm) -> AppResult<(AuthSession, UserProfile)> {
        form.validate()?;

        let email = form.email.trim();
        let session = self.auth.sign_up(email, &form.password).await?;
        let profile = UserProfile {
            username: form.username.clone(),
            email: session.email.clone(),
            country: form.country.clone(),
            avatar: DEFAULT_AVATAR.to_string(),
            created_at: Some(Utc::now()),
        };

        let store = self.store.as_user(&session.id_token);
        if let Err(e) = write(store.as_ref(), &session.user_id, &profile).await {
            tracing::error!(
                user_id = %session.user_id,
                error = %e,
                "Profile write failed, rolling back account"
            );
            if let Err(rollback) = self.auth.delete_account(&session.id_token).await {
                tracing::error!(error = %rollback, "Account rollback failed");
            }
            return Err(e);
        }

        tracing::info!(user_id = %session.user_id, country = %profile.country, "Profile created");
        Ok((session, profile))
    }

    pub async fn get(&self, session: &SessionContext) -> AppResult<UserProfile> {
        let (user_id, store) = self.user_store(session)?;
        read(store.as_ref(), user_id).await
    }

    pub async fn update(
        &self,
        session: &SessionContext,
        update: &ProfileUpdate,
    ) -> AppResult<UserProfile> {
        let (user_id, store) = self.user_store(session)?;
        update.validate()?;

        let mut profile = read(store.as_ref(), user_id).await?;
        if let Some(avatar) = &update.avatar {
            profile.avatar = avatar.clone();
        }
        if let Some(country) = &update.country {
            profile.country = country.clone();
        }

        write(store.as_ref(), user_id, &profile).await?;
        tracing::info!(user_id = %user_id, "Profile updated");
        Ok(profile)
    }

    /// Removes the profile document (favorites included), then the account
    pub async fn delete(&self, session: &SessionContext) -> AppResult<()> {
        let (user_id, store) = self.user_store(session)?;
        let id_token = session.require_token()?;

        store.delete(USERS, user_id).await?;
        self.auth.delete_account(id_token).await?;

        tracing::info!(user_id = %user_id, "Profile deleted");
        Ok(())
    }

    /// The caller's id and a store handle that acts with the caller's id token
    fn user_store<'a>(
        &self,
        session: &'a SessionContext,
    ) -> AppResult<(&'a str, Arc<dyn DocumentStore>)> {
        let user_id = session.require_user()?;
        let id_token = session.require_token()?;
        Ok((user_id, self.store.as_user(id_token)))
    }
}

async fn read(store: &dyn DocumentStore, user_id: &str) -> AppResult<UserProfile> {
    let doc = store
        .get(USERS, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile".to_string()))?;

    serde_json::from_value(Value::Object(doc.fields))
        .map_err(|e| AppError::Internal(format!("Profile deserialization error: {}", e)))
}

async fn write(store: &dyn DocumentStore, user_id: &str, profile: &UserProfile) -> AppResult<()> {
    let fields = match serde_json::to_value(profile) {
        Ok(Value::Object(map)) => map,
        Ok(_) => Map::new(),
        Err(e) => {
            return Err(AppError::Internal(format!(
                "Profile serialization error: {}",
                e
            )))
        }
    };
    store.put(USERS, user_id, fields).await
}
