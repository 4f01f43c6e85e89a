mod catalog;
mod query;
mod session;
mod user;

pub use catalog::{to_string_list, CatalogItem, ContentKind, IngestError, RawRecord, PLACEHOLDER_IMAGE};
pub use query::{Facet, FilterCriteria, SearchQuery};
pub use session::{sanitize_redirect, SessionContext};
pub use user::{
    is_known_country, is_valid_email, is_valid_username, Favorite, ProfileUpdate, SignUpForm,
    UserProfile, AVATAR_CHOICES, COUNTRIES, DEFAULT_AVATAR, MIN_PASSWORD_LEN,
};
