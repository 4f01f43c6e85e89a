use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::{
    error::{AppError, AppResult},
    models::{CatalogItem, ContentKind, FilterCriteria, RawRecord},
    services::{
        catalog_query, sample_data,
        store::{DocumentStore, MOVIES, SERIES},
    },
};

/// Default number of titles in the top-rated list
pub const DEFAULT_TOP_RATED: usize = 10;

/// Title counts per collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub movies_count: usize,
    pub series_count: usize,
    pub has_data: bool,
}

/// Loads the merged movie + series catalog and runs catalog queries over it
///
/// The catalog is fetched fresh for every call; nothing is cached between requests.
pub struct CatalogService {
    store: Arc<dyn DocumentStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Movies then series, fetched concurrently. A failed fetch contributes nothing.
    pub async fn load(&self) -> Vec<CatalogItem> {
        let (movies, series) = tokio::join!(
            self.load_collection(MOVIES),
            self.load_collection(SERIES)
        );

        let mut items = movies;
        items.extend(series);

        tracing::debug!(
            store = self.store.name(),
            total = items.len(),
            "Catalog loaded"
        );
        items
    }

    async fn load_collection(&self, collection: &str) -> Vec<CatalogItem> {
        match self.store.fetch_all(collection).await {
            Ok(records) => ingest(records),
            Err(e) => {
                tracing::warn!(
                    collection = %collection,
                    error = %e,
                    "Catalog fetch failed, continuing without it"
                );
                Vec::new()
            }
        }
    }

    pub async fn search(&self, query: &str) -> Vec<CatalogItem> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let results = catalog_query::search(&self.load().await, query);
        tracing::info!(query = %query, results = results.len(), "Title search completed");
        results
    }

    /// Applies criteria captured when the filter panel was submitted
    pub async fn filter(&self, criteria: &FilterCriteria) -> Vec<CatalogItem> {
        let results = catalog_query::filter(&self.load().await, criteria);
        tracing::info!(
            facets = criteria.active_facets().count(),
            results = results.len(),
            "Catalog filter applied"
        );
        results
    }

    pub async fn by_platform(&self, platform: &str) -> AppResult<Vec<CatalogItem>> {
        let platform = non_blank(platform, "platform")?;
        Ok(self.filter(&FilterCriteria::platform(platform)).await)
    }

    /// `label` is a content-type label such as "Movies" or "series"
    pub async fn by_content_type(&self, label: &str) -> AppResult<Vec<CatalogItem>> {
        let kind = ContentKind::from_label(label).ok_or_else(|| {
            AppError::InvalidInput(format!("Unknown content type: {}", label))
        })?;
        Ok(self
            .filter(&FilterCriteria::content_type(kind.facet_label()))
            .await)
    }

    pub async fn by_genre(&self, genre: &str) -> AppResult<Vec<CatalogItem>> {
        let genre = non_blank(genre, "genre")?;
        Ok(self.filter(&FilterCriteria::genre(genre)).await)
    }

    pub async fn top_rated(&self, limit: usize) -> Vec<CatalogItem> {
        catalog_query::top_rated(&self.load().await, limit)
    }

    /// A single title from either collection
    pub async fn get(&self, id: &str) -> AppResult<CatalogItem> {
        let (movie, series) = tokio::join!(
            self.store.get(MOVIES, id),
            self.store.get(SERIES, id)
        );

        let record = movie?
            .or(series?)
            .ok_or_else(|| AppError::NotFound(format!("Title {}", id)))?;

        CatalogItem::try_from(record).map_err(|e| AppError::NotFound(e.to_string()))
    }

    /// Stores a new title in the collection matching `kind` and returns its id
    pub async fn add_title(
        &self,
        kind: ContentKind,
        mut fields: Map<String, Value>,
    ) -> AppResult<String> {
        let has_title = fields
            .get("title")
            .and_then(Value::as_str)
            .is_some_and(|t| !t.trim().is_empty());
        if !has_title {
            return Err(AppError::InvalidInput("Title is required".to_string()));
        }

        let now = Value::String(Utc::now().to_rfc3339());
        fields.insert(
            "type".to_string(),
            Value::String(
                match kind {
                    ContentKind::Movie => "movie",
                    ContentKind::Series => "series",
                }
                .to_string(),
            ),
        );
        fields.insert("createdAt".to_string(), now.clone());
        fields.insert("updatedAt".to_string(), now);

        let id = self.store.add(kind.collection(), fields).await?;
        tracing::info!(collection = kind.collection(), id = %id, "Title added");
        Ok(id)
    }

    pub async fn stats(&self) -> AppResult<CatalogStats> {
        let (movies, series) = tokio::join!(
            self.store.fetch_all(MOVIES),
            self.store.fetch_all(SERIES)
        );
        let (movies_count, series_count) = (movies?.len(), series?.len());

        Ok(CatalogStats {
            movies_count,
            series_count,
            has_data: movies_count > 0 || series_count > 0,
        })
    }

    /// Writes the bundled sample catalog if the store has no titles yet.
    ///
    /// Returns whether anything was written.
    pub async fn seed_sample_data(&self) -> AppResult<bool> {
        let stats = self.stats().await?;
        if stats.has_data {
            tracing::info!(
                movies = stats.movies_count,
                series = stats.series_count,
                "Catalog already populated, skipping sample data"
            );
            return Ok(false);
        }

        let movies = sample_data::sample_movies();
        let series = sample_data::sample_series();
        let (movie_count, series_count) = (movies.len(), series.len());

        for fields in movies {
            self.add_title(ContentKind::Movie, fields).await?;
        }
        for fields in series {
            self.add_title(ContentKind::Series, fields).await?;
        }

        tracing::info!(
            movies = movie_count,
            series = series_count,
            "Sample catalog written"
        );
        Ok(true)
    }
}

/// Normalizes stored records, dropping ones that cannot be shown
fn ingest(records: Vec<RawRecord>) -> Vec<CatalogItem> {
    records
        .into_iter()
        .filter_map(|record| match CatalogItem::try_from(record) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping catalog record");
                None
            }
        })
        .collect()
}

fn non_blank<'a>(value: &'a str, field: &str) -> AppResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::InvalidInput(format!("{} cannot be empty", field)));
    }
    Ok(value)
}
