/// Identity Toolkit (Firebase Authentication) REST client
///
/// API Flow:
/// 1. Sign up: /v1/accounts:signUp → id token + local id
/// 2. Sign in: /v1/accounts:signInWithPassword → id token + local id
/// 3. Resolve a token: /v1/accounts:lookup → user record
/// 4. Delete: /v1/accounts:delete
///
/// Id tokens are self-contained, so signing out needs no call; the client just forgets the token.
use reqwest::Client as HttpClient;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    services::auth::{AuthClient, AuthSession},
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PasswordAuthResponse {
    id_token: String,
    local_id: String,
    #[serde(default)]
    email: String,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

#[derive(Clone)]
pub struct IdentityToolkitAuth {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl IdentityToolkitAuth {
    pub fn new(api_url: &str, api_key: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    /// POSTs to `accounts:{method}` and decodes the success body
    async fn call<T: DeserializeOwned>(&self, method: &str, body: Value) -> AppResult<T> {
        let url = format!("{}/v1/accounts:{}", self.api_url, method);

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            let code = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|e| e.error.message)
                .unwrap_or_default();

            tracing::warn!(
                method = method,
                status = %status,
                code = %code,
                "Identity Toolkit request failed"
            );
            return Err(map_error_code(&code, status.as_u16()));
        }

        Ok(response.json().await?)
    }

    async fn password_auth(&self, method: &str, email: &str, password: &str) -> AppResult<AuthSession> {
        let response: PasswordAuthResponse = self
            .call(
                method,
                json!({
                    "email": email,
                    "password": password,
                    "returnSecureToken": true,
                }),
            )
            .await?;

        Ok(AuthSession {
            user_id: response.local_id,
            email: if response.email.is_empty() {
                email.to_string()
            } else {
                response.email
            },
            id_token: response.id_token,
        })
    }
}

/// Maps provider error codes such as `EMAIL_EXISTS` or `WEAK_PASSWORD : ...` to app errors
fn map_error_code(code: &str, status: u16) -> AppError {
    let key = code.split(':').next().unwrap_or_default().trim();
    match key {
        "EMAIL_EXISTS" => AppError::InvalidInput("Email already in use".to_string()),
        "INVALID_EMAIL" => AppError::InvalidInput("Invalid email".to_string()),
        "WEAK_PASSWORD" => AppError::InvalidInput("Password is too weak".to_string()),
        "MISSING_PASSWORD" => AppError::InvalidInput("Password is required".to_string()),
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            AppError::Unauthorized("Invalid email or password".to_string())
        }
        "USER_DISABLED" => AppError::Unauthorized("Account disabled".to_string()),
        "INVALID_ID_TOKEN" | "TOKEN_EXPIRED" | "USER_NOT_FOUND" => {
            AppError::Unauthorized("Session expired".to_string())
        }
        "TOO_MANY_ATTEMPTS_TRY_LATER" => {
            AppError::ExternalApi("Too many attempts, try again later".to_string())
        }
        _ => AppError::ExternalApi(format!(
            "Identity Toolkit returned status {}: {}",
            status, code
        )),
    }
}

#[async_trait::async_trait]
impl AuthClient for IdentityToolkitAuth {
    async fn sign_up(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let session = self.password_auth("signUp", email, password).await?;
        tracing::info!(user_id = %session.user_id, "Account created");
        Ok(session)
    }

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let session = self
            .password_auth("signInWithPassword", email, password)
            .await?;
        tracing::info!(user_id = %session.user_id, "Signed in");
        Ok(session)
    }

    async fn sign_out(&self, _id_token: &str) -> AppResult<()> {
        tracing::debug!("Sign-out is client side for Identity Toolkit tokens");
        Ok(())
    }

    async fn current_user_id(&self, id_token: &str) -> AppResult<Option<String>> {
        let result: AppResult<LookupResponse> =
            self.call("lookup", json!({ "idToken": id_token })).await;

        match result {
            Ok(lookup) => Ok(lookup.users.into_iter().next().map(|u| u.local_id)),
            Err(AppError::Unauthorized(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn delete_account(&self, id_token: &str) -> AppResult<()> {
        let _: Value = self.call("delete", json!({ "idToken": id_token })).await?;
        tracing::info!("Account deleted");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "identity_toolkit"
    }
}
