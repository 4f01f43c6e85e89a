use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::CatalogItem;

/// A normalized search query: trimmed and lower-cased
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchQuery(String);

impl SearchQuery {
    pub fn parse(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Prefix match against a title, ignoring case
    pub fn matches_title(&self, title: &str) -> bool {
        !self.is_empty() && title.to_lowercase().starts_with(&self.0)
    }
}

/// One filterable dimension of a catalog item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    Genre,
    Platform,
    /// Matches `ContentKind::facet_label`; explicit `type` outranks `seasons` when resolving the kind
    ContentType,
    Language,
    Subtitle,
    Country,
}

impl Facet {
    pub const ALL: [Facet; 6] = [
        Facet::Genre,
        Facet::Platform,
        Facet::ContentType,
        Facet::Language,
        Facet::Subtitle,
        Facet::Country,
    ];

    /// The item's values for this facet
    pub fn item_values<'a>(&self, item: &'a CatalogItem) -> Vec<&'a str> {
        let values = match self {
            Facet::Genre => &item.genres,
            Facet::Platform => &item.platforms,
            Facet::Language => &item.languages,
            Facet::Subtitle => &item.subtitles,
            Facet::Country => &item.countries,
            Facet::ContentType => return vec![item.kind.facet_label()],
        };
        values.iter().map(String::as_str).collect()
    }
}

/// Selected facet values; an empty set leaves that facet unconstrained
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterCriteria {
    pub genres: BTreeSet<String>,
    pub platforms: BTreeSet<String>,
    pub content_type: BTreeSet<String>,
    pub languages: BTreeSet<String>,
    pub subtitles: BTreeSet<String>,
    pub countries: BTreeSet<String>,
}

impl FilterCriteria {
    /// Criteria with only the platform facet populated
    pub fn platform(platform: impl Into<String>) -> Self {
        Self::default().with(Facet::Platform, platform)
    }

    /// Criteria with only the content-type facet populated
    pub fn content_type(label: impl Into<String>) -> Self {
        Self::default().with(Facet::ContentType, label)
    }

    /// Criteria with only the genre facet populated
    pub fn genre(genre: impl Into<String>) -> Self {
        Self::default().with(Facet::Genre, genre)
    }

    /// Adds a value to a facet
    pub fn with(mut self, facet: Facet, value: impl Into<String>) -> Self {
        self.selected_mut(facet).insert(value.into());
        self
    }

    pub fn selected(&self, facet: Facet) -> &BTreeSet<String> {
        match facet {
            Facet::Genre => &self.genres,
            Facet::Platform => &self.platforms,
            Facet::ContentType => &self.content_type,
            Facet::Language => &self.languages,
            Facet::Subtitle => &self.subtitles,
            Facet::Country => &self.countries,
        }
    }

    fn selected_mut(&mut self, facet: Facet) -> &mut BTreeSet<String> {
        match facet {
            Facet::Genre => &mut self.genres,
            Facet::Platform => &mut self.platforms,
            Facet::ContentType => &mut self.content_type,
            Facet::Language => &mut self.languages,
            Facet::Subtitle => &mut self.subtitles,
            Facet::Country => &mut self.countries,
        }
    }

    /// Facets that constrain the result
    pub fn active_facets(&self) -> impl Iterator<Item = Facet> + '_ {
        Facet::ALL
            .into_iter()
            .filter(|f| !self.selected(*f).is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.active_facets().next().is_none()
    }
}
