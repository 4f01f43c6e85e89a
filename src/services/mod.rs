pub mod auth;
pub mod catalog;
pub mod catalog_query;
pub mod favorites;
pub mod profile;
pub mod sample_data;
pub mod store;

pub use catalog::{CatalogService, CatalogStats};
pub use favorites::FavoritesService;
pub use profile::ProfileService;
