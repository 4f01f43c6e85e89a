use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{error::AppResult, models::RawRecord, services::store::DocumentStore};

type Collection = BTreeMap<String, Map<String, Value>>;

/// In-process document store
///
/// Documents are kept per collection in id order, so `fetch_all` is deterministic.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<HashMap<String, Collection>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn fetch_all(&self, collection: &str) -> AppResult<Vec<RawRecord>> {
        let inner = self.inner.read().await;
        let records = inner
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| RawRecord::new(id.clone(), fields.clone()))
                    .collect()
            })
            .unwrap_or_default();
        Ok(records)
    }

    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<RawRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| RawRecord::new(id, fields.clone())))
    }

    async fn put(&self, collection: &str, id: &str, fields: Map<String, Value>) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        let doc = inner
            .entry(collection.to_string())
            .or_default()
            .entry(id.to_string())
            .or_default();
        doc.extend(fields);
        Ok(())
    }

    async fn add(&self, collection: &str, fields: Map<String, Value>) -> AppResult<String> {
        let id = Uuid::new_v4().simple().to_string();
        let mut inner = self.inner.write().await;
        inner
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), fields);
        Ok(id)
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        if let Some(docs) = inner.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }

    /// The in-process store has no access rules; the handle shares the same documents
    fn as_user(&self, _id_token: &str) -> Arc<dyn DocumentStore> {
        Arc::new(self.clone())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
