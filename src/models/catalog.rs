use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Image shown for titles that carry none
pub const PLACEHOLDER_IMAGE: &str = "/images/placeholder.png";

/// Untyped document as returned by the document store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Document id assigned by the store
    pub id: String,
    /// Document fields, in whatever shape the store holds them
    pub fields: Map<String, Value>,
}

impl RawRecord {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// First present, non-null field among `keys`
    fn first_of(&self, keys: &[&str]) -> Option<&Value> {
        keys.iter()
            .filter_map(|k| self.fields.get(*k))
            .find(|v| !v.is_null())
    }
}

/// Whether a catalog entry is a movie or a series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Movie,
    Series,
}

impl ContentKind {
    /// Parses the free-form `type` values found in stored records
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "movie" | "movies" | "film" => Some(ContentKind::Movie),
            "series" | "serie" | "tv_series" | "show" | "tv" => Some(ContentKind::Series),
            _ => None,
        }
    }

    /// Resolves the kind of a stored record.
    ///
    /// An explicit, recognised `type` field wins; otherwise a `seasons` field marks a series;
    /// otherwise the record is a movie.
    pub fn resolve(fields: &Map<String, Value>) -> Self {
        if let Some(kind) = fields
            .get("type")
            .and_then(Value::as_str)
            .and_then(ContentKind::from_label)
        {
            return kind;
        }

        match fields.get("seasons") {
            Some(v) if !v.is_null() => ContentKind::Series,
            _ => ContentKind::Movie,
        }
    }

    /// Label used by the content-type facet
    pub fn facet_label(&self) -> &'static str {
        match self {
            ContentKind::Movie => "Movies",
            ContentKind::Series => "Series",
        }
    }

    /// Store collection holding titles of this kind
    pub fn collection(&self) -> &'static str {
        match self {
            ContentKind::Movie => "movies",
            ContentKind::Series => "series",
        }
    }
}

/// A movie or series in the merged catalog, normalized at ingestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ContentKind,
    pub year: Option<String>,
    pub genres: Vec<String>,
    pub platforms: Vec<String>,
    pub languages: Vec<String>,
    pub subtitles: Vec<String>,
    pub countries: Vec<String>,
    pub image: String,
    pub rating: Option<f64>,
    pub description: Option<String>,
    pub seasons: Option<u32>,
}

/// Reasons a stored record cannot become a catalog item
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum IngestError {
    #[error("record {0} has no title")]
    MissingTitle(String),
}

impl TryFrom<RawRecord> for CatalogItem {
    type Error = IngestError;

    fn try_from(record: RawRecord) -> Result<Self, Self::Error> {
        let title = record
            .fields
            .get("title")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| IngestError::MissingTitle(record.id.clone()))?
            .to_string();

        let list = |keys: &[&str]| record.first_of(keys).map(to_string_list).unwrap_or_default();

        let year = record.first_of(&["year"]).and_then(scalar_to_string);
        let image = record
            .first_of(&["image", "posterUrl"])
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(PLACEHOLDER_IMAGE)
            .to_string();
        let rating = record.first_of(&["rating"]).and_then(|v| match v {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        });
        let seasons = record.first_of(&["seasons"]).and_then(|v| match v {
            Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        });
        let description = record
            .first_of(&["description"])
            .and_then(Value::as_str)
            .map(str::to_string);

        Ok(CatalogItem {
            kind: ContentKind::resolve(&record.fields),
            genres: list(&["genres", "genre"]),
            platforms: list(&["platforms"]),
            languages: list(&["languages", "language"]),
            subtitles: list(&["subtitles"]),
            countries: list(&["country", "countries"]),
            id: record.id,
            title,
            year,
            image,
            rating,
            description,
            seasons,
        })
    }
}

/// Normalizes a field that may be absent, a scalar, a named object or a list into a list of strings.
///
/// Blank strings are dropped; nested lists are flattened.
pub fn to_string_list(value: &Value) -> Vec<String> {
    let mut out = Vec::new();
    collect_strings(value, &mut out);
    out
}

fn collect_strings(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Array(values) => values.iter().for_each(|v| collect_strings(v, out)),
        Value::Object(map) => {
            if let Some(name) = map.get("name").and_then(Value::as_str) {
                push_non_blank(name, out);
            }
        }
        other => {
            if let Some(s) = scalar_to_string(other) {
                push_non_blank(&s, out);
            }
        }
    }
}

fn push_non_blank(s: &str, out: &mut Vec<String>) {
    let trimmed = s.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
