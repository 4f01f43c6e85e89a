use serde::Deserialize;

/// Which backend the catalog, favorites and accounts live in
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// In-process document store and accounts (local development, tests)
    Memory,
    /// Hosted Firestore document store + Identity Toolkit accounts
    Firebase,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Storage and authentication backend
    #[serde(default = "default_backend")]
    pub backend: Backend,

    /// Firebase web API key (required for the firebase backend)
    #[serde(default)]
    pub firebase_api_key: Option<String>,

    /// Firebase project id (required for the firebase backend)
    #[serde(default)]
    pub firebase_project_id: Option<String>,

    /// Firestore REST base URL
    #[serde(default = "default_firestore_url")]
    pub firestore_url: String,

    /// Identity Toolkit REST base URL
    #[serde(default = "default_identity_toolkit_url")]
    pub identity_toolkit_url: String,

    /// Write the bundled sample catalog on startup when the store is empty
    #[serde(default = "default_seed_sample_data")]
    pub seed_sample_data: bool,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_backend() -> Backend {
    Backend::Memory
}

fn default_firestore_url() -> String {
    "https://firestore.googleapis.com".to_string()
}

fn default_identity_toolkit_url() -> String {
    "https://identitytoolkit.googleapis.com".to_string()
}

fn default_seed_sample_data() -> bool {
    true
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Credentials needed to talk to the hosted Firebase services
#[derive(Debug, Clone)]
pub struct FirebaseCredentials {
    pub api_key: String,
    pub project_id: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let config = envy::from_env::<Config>()
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field requirements that serde defaults cannot express
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.backend == Backend::Firebase {
            self.firebase_credentials()?;
        }
        Ok(())
    }

    /// Returns the Firebase credentials, failing if either is missing or blank
    pub fn firebase_credentials(&self) -> anyhow::Result<FirebaseCredentials> {
        let api_key = self
            .firebase_api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("FIREBASE_API_KEY is required for the firebase backend"))?;
        let project_id = self
            .firebase_project_id
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!("FIREBASE_PROJECT_ID is required for the firebase backend")
            })?;

        Ok(FirebaseCredentials {
            api_key: api_key.to_string(),
            project_id: project_id.to_string(),
        })
    }

    /// Address the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> Config {
        let vars = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()));
        envy::from_iter::<_, Config>(vars).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = from_pairs(&[]);
        assert_eq!(config.backend, Backend::Memory);
        assert!(config.seed_sample_data);
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.firestore_url, "https://firestore.googleapis.com");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_firebase_backend_requires_credentials() {
        let config = from_pairs(&[("BACKEND", "firebase"), ("FIREBASE_API_KEY", "key")]);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("FIREBASE_PROJECT_ID"));
    }

    #[test]
    fn test_firebase_backend_with_credentials() {
        let config = from_pairs(&[
            ("BACKEND", "firebase"),
            ("FIREBASE_API_KEY", "key"),
            ("FIREBASE_PROJECT_ID", "streamaware-app"),
            ("PORT", "8080"),
        ]);
        assert!(config.validate().is_ok());
        let creds = config.firebase_credentials().unwrap();
        assert_eq!(creds.project_id, "streamaware-app");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_blank_api_key_rejected() {
        let config = from_pairs(&[
            ("BACKEND", "firebase"),
            ("FIREBASE_API_KEY", "  "),
            ("FIREBASE_PROJECT_ID", "p"),
        ]);
        assert!(config.firebase_credentials().is_err());
    }
}
