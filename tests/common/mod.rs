//! A tiny stand-in for the Firestore emulator, served by axum on a
//! background thread.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::Router;
use serde_json::{json, Value};

#[derive(Clone, Default)]
pub struct MockState {
    pub documents: Arc<Mutex<Vec<Value>>>,
    /// Paths of received DELETE requests.
    pub deleted: Arc<Mutex<Vec<String>>>,
    /// Bodies of received runQuery requests.
    pub queries: Arc<Mutex<Vec<Value>>>,
    /// Answer every request with HTTP 500.
    pub fail: Arc<Mutex<bool>>,
    /// Answer runQuery with HTTP 200 whose last element is an `error`.
    pub stream_error: Arc<Mutex<bool>>,
}

/// A Firestore document as the REST API returns it.
pub fn document(id: &str, title: &str, url: &str, created_at: &str) -> Value {
    json!({
        "name": format!("projects/demo-bookmarker/databases/(default)/documents/bookmarks/{}", id),
        "fields": {
            "title": { "stringValue": title },
            "url": { "stringValue": url },
            "createdAt": { "timestampValue": created_at },
        },
        "createTime": created_at,
        "updateTime": created_at,
    })
}

async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    body: String,
) -> (StatusCode, String) {
    if *state.fail.lock().unwrap() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": {"code": 500, "message": "boom"}}).to_string(),
        );
    }

    let path = uri.path().to_string();
    if method == Method::POST && path.ends_with("/documents:runQuery") {
        if let Ok(query) = serde_json::from_str::<Value>(&body) {
            state.queries.lock().unwrap().push(query);
        }
        let docs = state.documents.lock().unwrap();
        let mut items: Vec<Value> = docs
            .iter()
            .map(|d| json!({ "document": d, "readTime": "2024-01-01T00:00:00Z" }))
            .collect();
        if *state.stream_error.lock().unwrap() {
            items.push(json!({
                "error": { "code": 13, "message": "internal error", "status": "INTERNAL" }
            }));
        } else if items.is_empty() {
            items.push(json!({ "readTime": "2024-01-01T00:00:00Z" }));
        }
        return (StatusCode::OK, Value::Array(items).to_string());
    }

    if method == Method::DELETE && path.contains("/documents/") {
        let id = path.rsplit('/').next().unwrap_or_default().to_string();
        state.deleted.lock().unwrap().push(path.clone());
        state
            .documents
            .lock()
            .unwrap()
            .retain(|d| !d["name"].as_str().unwrap_or_default().ends_with(&format!("/{}", id)));
        return (StatusCode::OK, "{}".to_string());
    }

    (StatusCode::NOT_FOUND, format!("no route for {} {}", method, path))
}

/// Start the mock and return its `host:port` and shared state.
pub fn start_mock(documents: Vec<Value>) -> (String, MockState) {
    let state = MockState::default();
    *state.documents.lock().unwrap() = documents;

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();

    let app = Router::new().fallback(handle).with_state(state.clone());
    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });

    (addr.to_string(), state)
}
