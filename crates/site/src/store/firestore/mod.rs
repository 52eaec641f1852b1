//! Cloud Firestore client over the REST v1 API.
//!
//! Uses `reqwest` for HTTP and hand-written serde types for the typed value
//! encoding (see [`codec`]). Authenticates with a web API key, a bearer token,
//! or both, matching whatever the database's security rules expect.

mod codec;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::config::FirestoreConfig;
use crate::store::{Collection, Document, FieldValue, Fields, RecordStore, StoreError};

use codec::{
    ListResponse, RunQueryItem, WireDocument, WriteBody, decode_document, encode_fields,
    encode_value,
};

/// Documents requested per page when scanning a collection.
const LIST_PAGE_SIZE: &str = "300";

// =============================================================================
// FirestoreStore
// =============================================================================

/// Record store backed by a Cloud Firestore database.
#[derive(Clone)]
pub struct FirestoreStore {
    inner: Arc<FirestoreStoreInner>,
}

struct FirestoreStoreInner {
    client: reqwest::Client,
    /// `{endpoint}/projects/{project}/databases/{database}/documents`
    documents_url: String,
    api_key: Option<SecretString>,
    bearer_token: Option<SecretString>,
}

impl FirestoreStore {
    /// Create a new Firestore client.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Http` if the HTTP client cannot be built.
    pub fn new(config: &FirestoreConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        let documents_url = format!(
            "{}/projects/{}/databases/{}/documents",
            config.endpoint.trim_end_matches('/'),
            config.project_id,
            config.database
        );

        Ok(Self {
            inner: Arc::new(FirestoreStoreInner {
                client,
                documents_url,
                api_key: config.api_key.clone(),
                bearer_token: config.bearer_token.clone(),
            }),
        })
    }

    /// URL of a path below the documents root, e.g. `products/abc`.
    fn document_url(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = Url::parse(&self.inner.documents_url)?;
        url.path_segments_mut()
            .map_err(|()| {
                StoreError::InvalidDocument(format!(
                    "documents URL cannot have path segments: {}",
                    self.inner.documents_url
                ))
            })?
            .extend(segments);
        Ok(url)
    }

    /// Attach credentials to a request.
    fn request(&self, method: Method, mut url: Url) -> RequestBuilder {
        if let Some(key) = &self.inner.api_key {
            url.query_pairs_mut().append_pair("key", key.expose_secret());
        }

        let builder = self.inner.client.request(method, url);
        match &self.inner.bearer_token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }

    /// Send a request and parse the JSON response body.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, StoreError> {
        let response = request.send().await?;
        let status = response.status();

        // Body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "Firestore returned non-success status"
            );
            return Err(StoreError::Status {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse Firestore response"
            );
            StoreError::Parse(e)
        })
    }
}

#[async_trait]
impl RecordStore for FirestoreStore {
    #[instrument(skip(self, value), fields(collection = %collection))]
    async fn query_eq(
        &self,
        collection: Collection,
        field: &str,
        value: &FieldValue,
    ) -> Result<Vec<Document>, StoreError> {
        let url = Url::parse(&format!("{}:runQuery", self.inner.documents_url))?;
        let body = json!({
            "structuredQuery": {
                "from": [{ "collectionId": collection.name() }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": field },
                        "op": "EQUAL",
                        "value": encode_value(value),
                    }
                }
            }
        });

        let items: Vec<RunQueryItem> = self.send(self.request(Method::POST, url).json(&body)).await?;

        let documents = decode_listed(items.into_iter().filter_map(|item| item.document));

        debug!(count = documents.len(), "query returned documents");
        Ok(documents)
    }

    #[instrument(skip(self), fields(collection = %collection))]
    async fn list(&self, collection: Collection) -> Result<Vec<Document>, StoreError> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = self.document_url(&[collection.name()])?;
            {
                let mut query = url.query_pairs_mut();
                query.append_pair("pageSize", LIST_PAGE_SIZE);
                if let Some(token) = &page_token {
                    query.append_pair("pageToken", token);
                }
            }

            let page: ListResponse = self.send(self.request(Method::GET, url)).await?;
            documents.extend(decode_listed(page.documents));

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        debug!(count = documents.len(), "listed documents");
        Ok(documents)
    }

    #[instrument(skip(self, fields), fields(collection = %collection))]
    async fn create(&self, collection: Collection, fields: Fields) -> Result<String, StoreError> {
        let url = self.document_url(&[collection.name()])?;
        let body = WriteBody {
            fields: encode_fields(&fields),
        };

        let created: WireDocument = self.send(self.request(Method::POST, url).json(&body)).await?;
        let document = decode_document(created)?;

        debug!(id = %document.id, "document created");
        Ok(document.id)
    }

    #[instrument(skip(self, fields), fields(collection = %collection))]
    async fn update(
        &self,
        collection: Collection,
        id: &str,
        fields: Fields,
    ) -> Result<(), StoreError> {
        let mut url = self.document_url(&[collection.name(), id])?;
        {
            // Without an update mask Firestore replaces the whole document
            let mut query = url.query_pairs_mut();
            for key in fields.keys() {
                query.append_pair("updateMask.fieldPaths", key);
            }
            query.append_pair("currentDocument.exists", "true");
        }
        let body = WriteBody {
            fields: encode_fields(&fields),
        };

        match self
            .send::<WireDocument>(self.request(Method::PATCH, url).json(&body))
            .await
        {
            Ok(_) => Ok(()),
            Err(StoreError::Status { status: 404, .. }) => Err(StoreError::NotFound {
                collection,
                id: id.to_owned(),
            }),
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self), fields(collection = %collection))]
    async fn delete(&self, collection: Collection, id: &str) -> Result<(), StoreError> {
        let url = self.document_url(&[collection.name(), id])?;
        // Successful deletes return an empty JSON object
        let _: serde_json::Value = self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }
}

/// Decode every document of a listing or query result, skipping any that
/// carry a value this client cannot read.
fn decode_listed(documents: impl IntoIterator<Item = WireDocument>) -> Vec<Document> {
    documents
        .into_iter()
        .filter_map(|document| {
            let name = document.name.clone();
            decode_document(document)
                .inspect_err(|e| warn!(name = %name, error = %e, "Skipping undecodable document"))
                .ok()
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn config(api_key: Option<&str>) -> FirestoreConfig {
        FirestoreConfig {
            endpoint: "https://firestore.googleapis.com/v1/".to_string(),
            project_id: "herreria-web".to_string(),
            database: "(default)".to_string(),
            api_key: api_key.map(SecretString::from),
            bearer_token: None,
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_documents_url() {
        let store = FirestoreStore::new(&config(None)).unwrap();
        assert_eq!(
            store.inner.documents_url,
            "https://firestore.googleapis.com/v1/projects/herreria-web/databases/(default)/documents"
        );
    }

    #[test]
    fn test_document_url_appends_segments() {
        let store = FirestoreStore::new(&config(None)).unwrap();
        let url = store.document_url(&["products", "abc 1"]).unwrap();
        assert!(url.path().ends_with("/documents/products/abc%201"));
    }

    #[test]
    fn test_request_adds_api_key() {
        let store = FirestoreStore::new(&config(Some("AIzaTestKey"))).unwrap();
        let url = store.document_url(&["featured_products"]).unwrap();
        let request = store.request(Method::GET, url).build().unwrap();
        assert_eq!(request.url().query(), Some("key=AIzaTestKey"));
    }

    #[test]
    fn test_decode_listed_skips_bad_values() {
        let documents: Vec<WireDocument> = serde_json::from_value(json!([
            {
                "name": "projects/p/databases/(default)/documents/products/good",
                "fields": { "name": { "stringValue": "Reja" } }
            },
            {
                "name": "projects/p/databases/(default)/documents/products/bad",
                "fields": { "order": { "integerValue": "tres" } }
            }
        ]))
        .unwrap();

        let decoded = decode_listed(documents);
        let ids: Vec<&str> = decoded.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["good"]);
    }
}
