//! Cloud Firestore REST client.
//!
//! Only two endpoints are used:
//!
//! | Operation | Request |
//! |-----------|---------|
//! | list      | `POST {base}/projects/{p}/databases/(default)/documents:runQuery` |
//! | delete    | `DELETE {base}/projects/{p}/databases/(default)/documents/{collection}/{id}` |
//!
//! `runQuery` returns the whole result set in one response body, so there is
//! no paging. Each bookmark document carries `title` and `url` string fields
//! and a `createdAt` timestamp field:
//!
//! ```json
//! {
//!   "name": "projects/p/databases/(default)/documents/bookmarks/3Xk9...",
//!   "fields": {
//!     "title": { "stringValue": "The Rust Book" },
//!     "url": { "stringValue": "https://doc.rust-lang.org/book/" },
//!     "createdAt": { "timestampValue": "2019-05-01T10:00:00.123456Z" }
//!   }
//! }
//! ```
//!
//! # Emulator
//!
//! When `emulator_host` is configured (or `FIRESTORE_EMULATOR_HOST` is set),
//! requests go to `http://<host>/v1` with the emulator's `owner` token and no
//! key file is read.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::auth::{fetch_access_token, ServiceAccountKey};
use super::BookmarkStore;
use crate::config::Config;
use crate::error::BookmarkerError;
use crate::models::Bookmark;

const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";
const EMULATOR_TOKEN: &str = "owner";
const EMULATOR_PROJECT_ID: &str = "demo-bookmarker";

/// An authenticated Firestore client bound to one collection.
pub struct FirestoreStore {
    client: reqwest::Client,
    base_url: String,
    project_id: String,
    collection: String,
    order_by_created: bool,
    token: String,
}

impl FirestoreStore {
    /// Authenticate according to `config` and return a ready client.
    pub async fn connect(config: &Config) -> Result<Self> {
        let client = reqwest::Client::new();

        if let Some(ref host) = config.emulator_host {
            let project_id = if config.account_key_file.trim().is_empty() {
                EMULATOR_PROJECT_ID.to_string()
            } else {
                ServiceAccountKey::from_file(Path::new(&config.account_key_file))?.project_id
            };
            log::debug!("using Firestore emulator at {}", host);
            return Ok(Self::new(
                client,
                format!("http://{}/v1", host.trim_end_matches('/')),
                project_id,
                EMULATOR_TOKEN.to_string(),
                config,
            ));
        }

        let key = ServiceAccountKey::from_file(Path::new(&config.account_key_file))?;
        let token = fetch_access_token(&client, &key).await?;
        Ok(Self::new(
            client,
            FIRESTORE_BASE_URL.to_string(),
            key.project_id,
            token,
            config,
        ))
    }

    fn new(
        client: reqwest::Client,
        base_url: String,
        project_id: String,
        token: String,
        config: &Config,
    ) -> Self {
        Self {
            client,
            base_url,
            project_id,
            collection: config.collection.clone(),
            order_by_created: config.sort_by_created_at,
            token,
        }
    }

    fn documents_path(&self) -> String {
        format!("projects/{}/databases/(default)/documents", self.project_id)
    }

    /// The `structuredQuery` selecting the whole collection.
    pub fn list_query(&self) -> serde_json::Value {
        build_list_query(&self.collection, self.order_by_created)
    }
}

/// Build the `runQuery` request body for a full collection read.
pub fn build_list_query(collection: &str, order_by_created: bool) -> serde_json::Value {
    let mut query = serde_json::json!({
        "from": [{ "collectionId": collection }],
    });
    if order_by_created {
        query["orderBy"] = serde_json::json!([{
            "field": { "fieldPath": "createdAt" },
            "direction": "ASCENDING",
        }]);
    }
    serde_json::json!({ "structuredQuery": query })
}

#[async_trait]
impl BookmarkStore for FirestoreStore {
    async fn list(&self) -> Result<Vec<Bookmark>> {
        let url = format!("{}/{}:runQuery", self.base_url, self.documents_path());

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&self.list_query())
            .send()
            .await
            .map_err(|e| BookmarkerError::StoreConnect(format!("{}: {}", url, e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(BookmarkerError::StoreRead(format!(
                "runQuery failed (HTTP {}): {}",
                status,
                body.chars().take(500).collect::<String>()
            ))
            .into());
        }

        let body = resp
            .text()
            .await
            .map_err(|e| BookmarkerError::StoreRead(e.to_string()))?;
        let bookmarks = parse_run_query_response(&body)?;
        log::debug!("fetched {} bookmarks from '{}'", bookmarks.len(), self.collection);
        Ok(bookmarks)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let url = format!(
            "{}/{}/{}/{}",
            self.base_url,
            self.documents_path(),
            self.collection,
            id
        );

        let resp = self
            .client
            .delete(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| BookmarkerError::StoreConnect(format!("{}: {}", url, e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(BookmarkerError::StoreDelete(format!(
                "HTTP {} for '{}': {}",
                status,
                id,
                body.chars().take(500).collect::<String>()
            ))
            .into());
        }

        log::info!("deleted bookmark document {}", id);
        Ok(())
    }
}

// ============ Wire format ============

#[derive(Debug, Deserialize)]
struct RunQueryItem {
    #[serde(default)]
    document: Option<Document>,
    /// Set when the query failed partway through the result stream.
    #[serde(default)]
    error: Option<RpcStatus>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RpcStatus {
    code: i32,
    message: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct Document {
    name: String,
    #[serde(default)]
    fields: HashMap<String, FieldValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldValue {
    string_value: Option<String>,
    timestamp_value: Option<String>,
}

/// Decode a `runQuery` response body into bookmarks, in response order.
///
/// Items without a `document` (the trailing read-time marker of an empty
/// result, for instance) are skipped. An `error` item or a document that
/// cannot be decoded fails the whole listing.
pub fn parse_run_query_response(body: &str) -> Result<Vec<Bookmark>> {
    let items: Vec<RunQueryItem> = serde_json::from_str(body)
        .map_err(|e| BookmarkerError::StoreRead(format!("invalid runQuery response: {}", e)))?;

    let mut bookmarks = Vec::with_capacity(items.len());
    for item in items {
        if let Some(status) = item.error {
            return Err(BookmarkerError::StoreRead(format!(
                "runQuery aborted after {} documents: {} ({}): {}",
                bookmarks.len(),
                status.status,
                status.code,
                status.message
            ))
            .into());
        }
        if let Some(doc) = item.document {
            bookmarks.push(decode_document(doc)?);
        }
    }
    Ok(bookmarks)
}

fn decode_document(doc: Document) -> Result<Bookmark> {
    let id = doc
        .name
        .rsplit('/')
        .next()
        .unwrap_or(&doc.name)
        .to_string();

    let string_field = |field: &str| -> Result<String> {
        match doc.fields.get(field) {
            None => Ok(String::new()),
            Some(FieldValue {
                string_value: Some(s),
                ..
            }) => Ok(s.clone()),
            Some(_) => Err(BookmarkerError::StoreRead(format!(
                "failed to convert to Bookmark: {}: '{}' is not a string",
                doc.name, field
            ))
            .into()),
        }
    };

    let title = string_field("title")?;
    let url = string_field("url")?;

    let created_at = match doc.fields.get("createdAt") {
        None => None,
        Some(FieldValue {
            timestamp_value: Some(ts),
            ..
        }) => Some(parse_timestamp(ts).ok_or_else(|| {
            BookmarkerError::StoreRead(format!(
                "failed to convert to Bookmark: {}: bad createdAt '{}'",
                doc.name, ts
            ))
        })?),
        Some(_) => {
            return Err(BookmarkerError::StoreRead(format!(
                "failed to convert to Bookmark: {}: 'createdAt' is not a timestamp",
                doc.name
            ))
            .into())
        }
    };

    Ok(Bookmark {
        id,
        title,
        url,
        created_at,
    })
}

fn parse_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(ts)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
