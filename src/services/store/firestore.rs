/// Firestore REST document store
///
/// Talks to `projects/{project}/databases/(default)/documents` and converts Firestore's typed
/// values (`{"stringValue": "..."}`, `{"arrayValue": {"values": [...]}}`, ...) to plain JSON and back.
use std::sync::Arc;

use reqwest::{Client as HttpClient, Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::{json, Map, Number, Value};

use crate::{
    error::{AppError, AppResult},
    models::RawRecord,
    services::store::DocumentStore,
};

const PAGE_SIZE: u32 = 300;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<FirestoreDocument>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

impl FirestoreDocument {
    fn into_record(self) -> RawRecord {
        let id = self
            .name
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string();
        RawRecord::new(id, decode_fields(&self.fields))
    }
}

#[derive(Clone)]
pub struct FirestoreStore {
    http_client: HttpClient,
    api_key: String,
    documents_url: String,
    /// Sent as a bearer token when the store acts for a signed-in account
    id_token: Option<String>,
}

impl FirestoreStore {
    pub fn new(base_url: &str, project_id: &str, api_key: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            documents_url: format!(
                "{}/v1/projects/{}/databases/(default)/documents",
                base_url.trim_end_matches('/'),
                project_id
            ),
            id_token: None,
        }
    }

    fn collection_url(&self, collection: &str) -> AppResult<Url> {
        self.url_with_segments(&[collection])
    }

    /// Ids are pushed as single path segments, so `/`, `?` and `#` are escaped
    fn document_url(&self, collection: &str, id: &str) -> AppResult<Url> {
        self.url_with_segments(&[collection, id])
    }

    fn url_with_segments(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = Url::parse(&self.documents_url)
            .map_err(|e| AppError::Internal(format!("Invalid Firestore URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::Internal("Firestore URL cannot take a path".to_string()))?
            .extend(segments);
        Ok(url)
    }

    /// Request carrying the API key and, for a user handle, the id token
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let request = self
            .http_client
            .request(method, url)
            .query(&[("key", self.api_key.as_str())]);
        match &self.id_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Turns a non-success response into an `ExternalApi` error
    async fn check(response: Response, operation: &str) -> AppResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::error!(
            operation = operation,
            status = %status,
            body = %body,
            "Firestore request failed"
        );
        Err(AppError::ExternalApi(format!(
            "Firestore returned status {}: {}",
            status, body
        )))
    }
}

#[async_trait::async_trait]
impl DocumentStore for FirestoreStore {
    async fn fetch_all(&self, collection: &str) -> AppResult<Vec<RawRecord>> {
        let url = self.collection_url(collection)?;
        let mut records = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self
                .request(Method::GET, url.clone())
                .query(&[("pageSize", PAGE_SIZE)]);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token.as_str())]);
            }

            let response = Self::check(request.send().await?, "list").await?;
            let page: ListDocumentsResponse = response.json().await?;
            records.extend(page.documents.into_iter().map(FirestoreDocument::into_record));

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        tracing::debug!(
            collection = %collection,
            count = records.len(),
            "Fetched Firestore collection"
        );

        Ok(records)
    }

    async fn get(&self, collection: &str, id: &str) -> AppResult<Option<RawRecord>> {
        let response = self
            .request(Method::GET, self.document_url(collection, id)?)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let document: FirestoreDocument = Self::check(response, "get").await?.json().await?;
        Ok(Some(document.into_record()))
    }

    async fn put(&self, collection: &str, id: &str, fields: Map<String, Value>) -> AppResult<()> {
        // The update mask limits the write to the given fields, leaving the rest intact
        let mask: Vec<(&str, &str)> = fields
            .keys()
            .map(|k| ("updateMask.fieldPaths", k.as_str()))
            .collect();

        let response = self
            .request(Method::PATCH, self.document_url(collection, id)?)
            .query(&mask)
            .json(&json!({ "fields": encode_fields(&fields) }))
            .send()
            .await?;

        Self::check(response, "patch").await?;
        Ok(())
    }

    async fn add(&self, collection: &str, fields: Map<String, Value>) -> AppResult<String> {
        let response = self
            .request(Method::POST, self.collection_url(collection)?)
            .json(&json!({ "fields": encode_fields(&fields) }))
            .send()
            .await?;

        let document: FirestoreDocument = Self::check(response, "create").await?.json().await?;
        let record = document.into_record();

        tracing::info!(collection = %collection, id = %record.id, "Created Firestore document");
        Ok(record.id)
    }

    async fn delete(&self, collection: &str, id: &str) -> AppResult<()> {
        let response = self
            .request(Method::DELETE, self.document_url(collection, id)?)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        Self::check(response, "delete").await?;
        Ok(())
    }

    fn as_user(&self, id_token: &str) -> Arc<dyn DocumentStore> {
        Arc::new(Self {
            id_token: Some(id_token.to_string()),
            ..self.clone()
        })
    }

    fn name(&self) -> &'static str {
        "firestore"
    }
}

/// Firestore `fields` map to plain JSON object
pub fn decode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), decode_value(v)))
        .collect()
}

/// One Firestore typed value to plain JSON; unknown shapes decode to `null`
pub fn decode_value(value: &Value) -> Value {
    let Some(map) = value.as_object() else {
        return Value::Null;
    };
    let Some((kind, inner)) = map.iter().next() else {
        return Value::Null;
    };

    match kind.as_str() {
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner.clone(),
        "booleanValue" => inner.clone(),
        "nullValue" => Value::Null,
        // integers travel as strings to keep 64-bit precision
        "integerValue" => match inner {
            Value::String(s) => s
                .parse::<i64>()
                .map(|n| Value::Number(n.into()))
                .unwrap_or(Value::Null),
            Value::Number(n) => Value::Number(n.clone()),
            _ => Value::Null,
        },
        "doubleValue" => match inner {
            Value::Number(n) => Value::Number(n.clone()),
            Value::String(s) => s
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            _ => Value::Null,
        },
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        "mapValue" => Value::Object(
            inner
                .get("fields")
                .and_then(Value::as_object)
                .map(decode_fields)
                .unwrap_or_default(),
        ),
        "geoPointValue" => inner.clone(),
        _ => Value::Null,
    }
}

/// Plain JSON object to a Firestore `fields` map
pub fn encode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), encode_value(v)))
        .collect()
}

pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or_default() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(values) => {
            let values: Vec<Value> = values.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}
