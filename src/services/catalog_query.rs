//! Catalog query engine: prefix search and faceted filtering over the merged catalog.
//!
//! Everything here is pure and synchronous. Missing or oddly shaped fields were already
//! normalized at ingestion, so an item without values for a facet simply does not match it.

use std::cmp::Ordering;

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::models::{CatalogItem, Facet, FilterCriteria, SearchQuery};

/// Titles starting with `query`, sorted by title.
///
/// An empty (or all-whitespace) query returns nothing rather than the whole catalog.
pub fn search(items: &[CatalogItem], query: &str) -> Vec<CatalogItem> {
    let query = SearchQuery::parse(query);
    if query.is_empty() {
        return Vec::new();
    }

    let mut results: Vec<CatalogItem> = items
        .iter()
        .filter(|item| query.matches_title(&item.title))
        .cloned()
        .collect();

    results.sort_by(|a, b| compare_titles(&a.title, &b.title));
    results
}

/// Items passing every non-empty facet of `criteria`, in input order.
///
/// The content-type facet sees the kind fixed at ingestion by `ContentKind::resolve`: an explicit
/// `type` outranks `seasons`, so `{"type": "movie", "seasons": 3}` is a movie here.
pub fn filter(items: &[CatalogItem], criteria: &FilterCriteria) -> Vec<CatalogItem> {
    items
        .iter()
        .filter(|item| matches_criteria(item, criteria))
        .cloned()
        .collect()
}

/// Rated items, best first, at most `limit` of them
pub fn top_rated(items: &[CatalogItem], limit: usize) -> Vec<CatalogItem> {
    let mut rated: Vec<CatalogItem> = items
        .iter()
        .filter(|item| item.rating.is_some_and(|r| r.is_finite()))
        .cloned()
        .collect();

    rated.sort_by(|a, b| {
        let (ra, rb) = (a.rating.unwrap_or(0.0), b.rating.unwrap_or(0.0));
        rb.partial_cmp(&ra)
            .unwrap_or(Ordering::Equal)
            .then_with(|| compare_titles(&a.title, &b.title))
    });
    rated.truncate(limit);
    rated
}

/// AND across facets
pub fn matches_criteria(item: &CatalogItem, criteria: &FilterCriteria) -> bool {
    criteria
        .active_facets()
        .all(|facet| matches_facet(item, facet, criteria))
}

/// OR within a facet: some item value contains some selected value, ignoring case
fn matches_facet(item: &CatalogItem, facet: Facet, criteria: &FilterCriteria) -> bool {
    let wanted: Vec<String> = criteria
        .selected(facet)
        .iter()
        .map(|v| v.to_lowercase())
        .collect();

    facet.item_values(item).into_iter().any(|value| {
        let value = value.to_lowercase();
        wanted.iter().any(|w| value.contains(w.as_str()))
    })
}

/// Locale-style title comparison: accents and case only break ties
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

/// Decomposes, drops combining marks and lower-cases, so "Élite" sorts next to "Elite"
pub fn collation_key(title: &str) -> String {
    title
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}
