/// Document store abstraction
///
/// The catalog, favorites and profiles all live in a hosted document database. Everything in the
/// crate talks to it through `DocumentStore`, so the backend can be swapped between the hosted
/// Firestore REST API and an in-process store.
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::{error::AppResult, models::RawRecord};

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreStore;
pub use memory::MemoryStore;

/// Collection holding movie records
pub const MOVIES: &str = "movies";
/// Collection holding series records
pub const SERIES: &str = "series";
/// Collection holding one document per account
pub const USERS: &str = "users";

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document in a collection
    async fn fetch_all(&self, collection: &str) -> AppResult<Vec<RawRecord>>;

    /// A single document, `None` if it does not exist
    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<RawRecord>>;

    /// Creates or replaces the given fields of a document
    async fn put(&self, collection: &str, id: &str, fields: Map<String, Value>) -> AppResult<()>;

    /// Creates a document with a store-assigned id and returns that id
    async fn add(&self, collection: &str, fields: Map<String, Value>) -> AppResult<String>;

    /// Removes a document; removing a missing document is not an error
    async fn delete(&self, collection: &str, id: &str) -> AppResult<()>;

    /// A handle that performs every call as the account behind `id_token`, so per-user documents
    /// pass the backend's access rules
    fn as_user(&self, id_token: &str) -> Arc<dyn DocumentStore>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}
