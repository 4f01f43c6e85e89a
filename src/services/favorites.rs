use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value};

use crate::{
    error::{AppError, AppResult},
    models::{CatalogItem, Favorite, SessionContext},
    services::{
        catalog::CatalogService,
        store::{DocumentStore, USERS},
    },
};

const FAVORITES_FIELD: &str = "favorites";

/// Per-account favorites list, kept in the account's `users/{uid}` document.
///
/// Guests get `AuthRequired` for every operation.
pub struct FavoritesService {
    store: Arc<dyn DocumentStore>,
    catalog: Arc<CatalogService>,
}

impl FavoritesService {
    pub fn new(store: Arc<dyn DocumentStore>, catalog: Arc<CatalogService>) -> Self {
        Self { store, catalog }
    }

    pub async fn list(&self, session: &SessionContext) -> AppResult<Vec<Favorite>> {
        let (user_id, store) = self.user_store(session)?;
        load(store.as_ref(), user_id).await
    }

    pub async fn contains(&self, session: &SessionContext, content_id: &str) -> AppResult<bool> {
        let content_id = content_id.trim();
        Ok(self
            .list(session)
            .await?
            .iter()
            .any(|f| f.id == content_id))
    }

    /// Adds a title; adding one that is already there keeps the original entry
    pub async fn add(
        &self,
        session: &SessionContext,
        content_id: &str,
        content_type: &str,
    ) -> AppResult<Vec<Favorite>> {
        let (user_id, store) = self.user_store(session)?;
        let content_id = content_id.trim();
        if content_id.is_empty() {
            return Err(AppError::InvalidInput(
                "Favorite id cannot be empty".to_string(),
            ));
        }

        let mut favorites = load(store.as_ref(), user_id).await?;
        if favorites.iter().any(|f| f.id == content_id) {
            return Ok(favorites);
        }

        favorites.push(Favorite {
            id: content_id.to_string(),
            content_type: match content_type.trim() {
                "" => "unknown".to_string(),
                t => t.to_string(),
            },
            added_at: Utc::now(),
        });
        save(store.as_ref(), user_id, &favorites).await?;

        tracing::info!(user_id = %user_id, content_id = %content_id, "Favorite added");
        Ok(favorites)
    }

    /// Removes a title; removing one that is not there is a no-op
    pub async fn remove(
        &self,
        session: &SessionContext,
        content_id: &str,
    ) -> AppResult<Vec<Favorite>> {
        let (user_id, store) = self.user_store(session)?;
        let content_id = content_id.trim();

        let mut favorites = load(store.as_ref(), user_id).await?;
        let before = favorites.len();
        favorites.retain(|f| f.id != content_id);

        if favorites.len() != before {
            save(store.as_ref(), user_id, &favorites).await?;
            tracing::info!(user_id = %user_id, content_id = %content_id, "Favorite removed");
        }
        Ok(favorites)
    }

    /// Favorites resolved against the current catalog, in the order they were added.
    ///
    /// Titles that have left the catalog are skipped.
    pub async fn list_items(&self, session: &SessionContext) -> AppResult<Vec<CatalogItem>> {
        Ok(self.list_with_items(session).await?.1)
    }

    /// The stored entries together with the titles they resolve to, from one document read
    pub async fn list_with_items(
        &self,
        session: &SessionContext,
    ) -> AppResult<(Vec<Favorite>, Vec<CatalogItem>)> {
        let favorites = self.list(session).await?;
        if favorites.is_empty() {
            return Ok((favorites, Vec::new()));
        }

        let catalog = self.catalog.load().await;
        let items = favorites
            .iter()
            .filter_map(|f| catalog.iter().find(|item| item.id == f.id).cloned())
            .collect();
        Ok((favorites, items))
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

async fn load(store: &dyn DocumentStore, user_id: &str) -> AppResult<Vec<Favorite>> {
    let Some(doc) = store.get(USERS, user_id).await? else {
        return Ok(Vec::new());
    };

    let entries = match doc.fields.get(FAVORITES_FIELD) {
        Some(Value::Array(entries)) => entries.clone(),
        _ => return Ok(Vec::new()),
    };

    Ok(entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<Favorite>(entry) {
            Ok(fav) => Some(fav),
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "Skipping malformed favorite");
                None
            }
        })
        .collect())
}

async fn save(store: &dyn DocumentStore, user_id: &str, favorites: &[Favorite]) -> AppResult<()> {
    let value = serde_json::to_value(favorites)
        .map_err(|e| AppError::Internal(format!("Favorites serialization error: {}", e)))?;

    let mut fields = Map::new();
    fields.insert(FAVORITES_FIELD.to_string(), value);
    store.put(USERS, user_id, fields).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentKind;
    use crate::services::store::{MemoryStore, MockDocumentStore};
    use crate::models::RawRecord;
    use serde_json::json;

    async fn setup() -> (FavoritesService, Arc<CatalogService>, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let catalog = Arc::new(CatalogService::new(store.clone()));
        let favorites = FavoritesService::new(store.clone(), catalog.clone());
        (favorites, catalog, store)
    }

    fn user() -> SessionContext {
        SessionContext::authenticated("uid-1", "token-1")
    }

    #[tokio::test]
    async fn test_guest_is_gated() {
        let (favorites, _, _) = setup().await;
        let guest = SessionContext::guest().with_pending_redirect(Some("/details"));

        let err = favorites.add(&guest, "abc", "movie").await.unwrap_err();
        match err {
            AppError::AuthRequired { redirect } => {
                assert_eq!(redirect.as_deref(), Some("/details"))
            }
            other => panic!("expected AuthRequired, got {:?}", other),
        }
        assert!(favorites.list(&guest).await.is_err());
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let (favorites, _, _) = setup().await;
        let first = favorites.add(&user(), "abc", "series").await.unwrap();
        let again = favorites.add(&user(), "abc", "movie").await.unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(again, first);
        assert!(favorites.contains(&user(), "abc").await.unwrap());
    }

    #[tokio::test]
    async fn test_remove() {
        let (favorites, _, _) = setup().await;
        favorites.add(&user(), "a", "movie").await.unwrap();
        favorites.add(&user(), "b", "").await.unwrap();

        let left = favorites.remove(&user(), "a").await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, "b");
        assert_eq!(left[0].content_type, "unknown");

        let unchanged = favorites.remove(&user(), "zzz").await.unwrap();
        assert_eq!(unchanged, left);
    }

    #[tokio::test]
    async fn test_favorites_keep_profile_fields() {
        let (favorites, _, store) = setup().await;
        let Value::Object(profile) = json!({"username": "fan", "country": "Denmark"}) else {
            unreachable!()
        };
        store.put(USERS, "uid-1", profile).await.unwrap();

        favorites.add(&user(), "abc", "movie").await.unwrap();

        let doc = store.get(USERS, "uid-1").await.unwrap().unwrap();
        assert_eq!(doc.fields["username"], "fan");
        assert_eq!(doc.fields["favorites"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_entries_are_skipped() {
        let (favorites, _, store) = setup().await;
        let Value::Object(doc) = json!({"favorites": [
            {"id": "ok", "type": "movie", "addedAt": "2025-10-01T12:00:00Z"},
            {"oops": true}
        ]}) else {
            unreachable!()
        };
        store.put(USERS, "uid-1", doc).await.unwrap();

        let list = favorites.list(&user()).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, "ok");
    }

    #[tokio::test]
    async fn test_list_items_resolves_catalog() {
        let (favorites, catalog, _) = setup().await;
        let Value::Object(fields) = json!({"title": "Druk"}) else {
            unreachable!()
        };
        let id = catalog.add_title(ContentKind::Movie, fields).await.unwrap();

        favorites.add(&user(), &id, "movie").await.unwrap();
        favorites.add(&user(), "gone", "movie").await.unwrap();

        let items = favorites.list_items(&user()).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Druk");
    }

    #[tokio::test]
    async fn test_remove_trims_id_like_add() {
        let (favorites, _, _) = setup().await;
        favorites.add(&user(), " abc ", "movie").await.unwrap();
        assert!(favorites.contains(&user(), "abc").await.unwrap());

        let left = favorites.remove(&user(), " abc").await.unwrap();
        assert!(left.is_empty());
    }

    #[tokio::test]
    async fn test_list_with_items_reads_document_once() {
        let (_, catalog, _) = setup().await;

        let mut user_store = MockDocumentStore::new();
        user_store.expect_get().times(1).returning(|_, id| {
            let Value::Object(fields) = json!({"favorites": [
                {"id": "abc", "type": "movie", "addedAt": "2025-10-01T12:00:00Z"}
            ]}) else {
                unreachable!()
            };
            Ok(Some(RawRecord::new(id, fields)))
        });
        let user_store: Arc<dyn DocumentStore> = Arc::new(user_store);

        let mut store = MockDocumentStore::new();
        store
            .expect_as_user()
            .withf(|token| token == "token-1")
            .return_once(move |_| user_store);

        let favorites = FavoritesService::new(Arc::new(store), catalog);
        let (entries, items) = favorites.list_with_items(&user()).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert!(items.is_empty());
    }
}
