use std::sync::Arc;

use crate::services::{
    auth::{AuthClient, MemoryAuth},
    store::{DocumentStore, MemoryStore},
    CatalogService, FavoritesService, ProfileService,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
    pub favorites: Arc<FavoritesService>,
    pub profiles: Arc<ProfileService>,
    pub auth: Arc<dyn AuthClient>,
}

impl AppState {
    /// Wires every service onto one document store and one auth backend
    pub fn new(store: Arc<dyn DocumentStore>, auth: Arc<dyn AuthClient>) -> Self {
        let catalog = Arc::new(CatalogService::new(store.clone()));
        Self {
            favorites: Arc::new(FavoritesService::new(store.clone(), catalog.clone())),
            profiles: Arc::new(ProfileService::new(store, auth.clone())),
            catalog,
            auth,
        }
    }

    /// Empty in-process backends
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(MemoryAuth::new()))
    }
}
