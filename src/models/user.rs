use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::error::{AppError, AppResult};

/// Avatars a profile may pick from
pub const AVATAR_CHOICES: [&str; 4] = [
    "/images/cat-profile.svg",
    "/images/dog-profile.svg",
    "/images/lion-profile.svg",
    "/images/rabbit-profile.svg",
];

pub const DEFAULT_AVATAR: &str = AVATAR_CHOICES[0];

/// Countries a profile may be registered in
pub const COUNTRIES: [&str; 50] = [
    "Albania",
    "Andorra",
    "Armenia",
    "Austria",
    "Azerbaijan",
    "Belarus",
    "Belgium",
    "Bosnia and Herzegovina",
    "Bulgaria",
    "Croatia",
    "Cyprus",
    "Czech Republic",
    "Denmark",
    "Estonia",
    "Finland",
    "France",
    "Georgia",
    "Germany",
    "Greece",
    "Hungary",
    "Iceland",
    "Ireland",
    "Italy",
    "Kazakhstan",
    "Kosovo",
    "Latvia",
    "Liechtenstein",
    "Lithuania",
    "Luxembourg",
    "Malta",
    "Moldova",
    "Monaco",
    "Montenegro",
    "Netherlands",
    "North Macedonia",
    "Norway",
    "Poland",
    "Portugal",
    "Romania",
    "San Marino",
    "Serbia",
    "Slovakia",
    "Slovenia",
    "Spain",
    "Sweden",
    "Switzerland",
    "Turkey",
    "Ukraine",
    "United Kingdom",
    "Vatican City",
];

pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Profile stored in the `users/{uid}` document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub username: String,
    pub email: String,
    pub country: String,
    #[serde(default = "default_avatar")]
    pub avatar: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_avatar() -> String {
    DEFAULT_AVATAR.to_string()
}

/// A title on a user's favorites list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: String,
    #[serde(rename = "type")]
    pub content_type: String,
    pub added_at: DateTime<Utc>,
}

/// Sign-up form as submitted by the client
#[derive(Debug, Clone, Deserialize)]
pub struct SignUpForm {
    pub username: String,
    pub email: String,
    pub country: String,
    pub password: String,
}

impl SignUpForm {
    /// Validates every field, reporting all failing fields at once
    pub fn validate(&self) -> AppResult<()> {
        let mut invalid = Vec::new();

        if !is_valid_username(&self.username) {
            invalid.push("username");
        }
        if !is_valid_email(&self.email) {
            invalid.push("email");
        }
        if !is_known_country(&self.country) {
            invalid.push("country");
        }
        if self.password.trim().is_empty() || self.password.chars().count() < MIN_PASSWORD_LEN {
            invalid.push("password");
        }

        if invalid.is_empty() {
            Ok(())
        } else {
            Err(AppError::InvalidInput(format!(
                "Invalid fields: {}",
                invalid.join(", ")
            )))
        }
    }
}

/// Partial profile update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub avatar: Option<String>,
    pub country: Option<String>,
}

impl ProfileUpdate {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(avatar) = &self.avatar {
            if !AVATAR_CHOICES.contains(&avatar.as_str()) {
                return Err(AppError::InvalidInput(format!("Unknown avatar: {}", avatar)));
            }
        }
        if let Some(country) = &self.country {
            if !is_known_country(country) {
                return Err(AppError::InvalidInput(format!(
                    "Unsupported country: {}",
                    country
                )));
            }
        }
        Ok(())
    }
}

/// Letters, digits and underscores only
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email.trim())
}

pub fn is_known_country(country: &str) -> bool {
    COUNTRIES.contains(&country)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> SignUpForm {
        SignUpForm {
            username: "movie_fan_42".to_string(),
            email: "fan@example.com".to_string(),
            country: "Denmark".to_string(),
            password: "secret1".to_string(),
        }
    }

    #[test]
    fn test_valid_form() {
        assert!(form().validate().is_ok());
    }

    #[test]
    fn test_reports_all_invalid_fields() {
        let bad = SignUpForm {
            username: "bad name!".to_string(),
            email: "not-an-email".to_string(),
            country: "".to_string(),
            password: "123".to_string(),
        };

        let err = bad.validate().unwrap_err().to_string();
        assert!(err.contains("username"));
        assert!(err.contains("email"));
        assert!(err.contains("country"));
        assert!(err.contains("password"));
    }

    #[test]
    fn test_email_rules() {
        assert!(is_valid_email("a@b.dk"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.dk"));
        assert!(!is_valid_email("@c.dk"));
    }

    #[test]
    fn test_username_rules() {
        assert!(is_valid_username("Under_Score9"));
        assert!(!is_valid_username(""));
        assert!(!is_valid_username("æøå"));
    }

    #[test]
    fn test_profile_update_validation() {
        let ok = ProfileUpdate {
            avatar: Some("/images/lion-profile.svg".to_string()),
            country: Some("Sweden".to_string()),
        };
        assert!(ok.validate().is_ok());

        let bad_avatar = ProfileUpdate {
            avatar: Some("/images/shark.svg".to_string()),
            country: None,
        };
        assert!(bad_avatar.validate().is_err());

        let bad_country = ProfileUpdate {
            avatar: None,
            country: Some("USA".to_string()),
        };
        assert!(bad_country.validate().is_err());
    }

    #[test]
    fn test_profile_defaults_avatar() {
        let profile: UserProfile = serde_json::from_str(
            r#"{"username":"u","email":"u@x.dk","country":"Norway","favorites":[]}"#,
        )
        .unwrap();
        assert_eq!(profile.avatar, DEFAULT_AVATAR);
        assert!(profile.created_at.is_none());
    }

    #[test]
    fn test_favorite_type_field() {
        let fav = Favorite {
            id: "abc".to_string(),
            content_type: "series".to_string(),
            added_at: Utc::now(),
        };
        let json = serde_json::to_value(&fav).unwrap();
        assert_eq!(json["type"], "series");
        assert!(json.get("addedAt").is_some());
    }
}
