//! In-process stand-in for the remote character collection.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordedRequest {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Default)]
struct CollectionState {
    characters: Vec<Value>,
    next_id: i64,
    requests: Vec<RecordedRequest>,
    fail_reads: bool,
    fail_writes: bool,
    malformed_reads: bool,
}

#[derive(Clone, Default)]
pub(crate) struct FakeCollection {
    inner: Arc<Mutex<CollectionState>>,
}

impl FakeCollection {
    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.lock().await.requests.clone()
    }

    pub async fn writes(&self) -> Vec<RecordedRequest> {
        self.requests()
            .await
            .into_iter()
            .filter(|request| request.method != "GET")
            .collect()
    }

    pub async fn stored_votes(&self, id: i64) -> Option<u64> {
        let guard = self.inner.lock().await;
        guard
            .characters
            .iter()
            .find(|character| character["id"] == json!(id))
            .and_then(|character| character["votes"].as_u64())
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.characters.len()
    }

    pub async fn fail_reads(&self, fail: bool) {
        self.inner.lock().await.fail_reads = fail;
    }

    pub async fn fail_writes(&self, fail: bool) {
        self.inner.lock().await.fail_writes = fail;
    }

    pub async fn malformed_reads(&self, malformed: bool) {
        self.inner.lock().await.malformed_reads = malformed;
    }
}

fn id_matches(character: &Value, id: &str) -> bool {
    match &character["id"] {
        Value::Number(number) => number.to_string() == id,
        Value::String(text) => text == id,
        _ => false,
    }
}

fn malformed() -> Response {
    (StatusCode::OK, "<html>not json</html>").into_response()
}

async fn list_characters(State(state): State<FakeCollection>) -> Response {
    let mut guard = state.inner.lock().await;
    guard.requests.push(RecordedRequest {
        method: "GET",
        path: "/characters".into(),
        body: None,
    });
    if guard.fail_reads {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    if guard.malformed_reads {
        return malformed();
    }
    Json(Value::Array(guard.characters.clone())).into_response()
}

async fn get_character(State(state): State<FakeCollection>, Path(id): Path<String>) -> Response {
    let mut guard = state.inner.lock().await;
    guard.requests.push(RecordedRequest {
        method: "GET",
        path: format!("/characters/{id}"),
        body: None,
    });
    if guard.fail_reads {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    if guard.malformed_reads {
        return malformed();
    }
    match guard.characters.iter().find(|c| id_matches(c, &id)) {
        Some(character) => Json(character.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn patch_character(
    State(state): State<FakeCollection>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut guard = state.inner.lock().await;
    guard.requests.push(RecordedRequest {
        method: "PATCH",
        path: format!("/characters/{id}"),
        body: Some(body.clone()),
    });
    if guard.fail_writes {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let Some(character) = guard.characters.iter_mut().find(|c| id_matches(c, &id)) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    if let (Some(target), Some(fields)) = (character.as_object_mut(), body.as_object()) {
        for (key, value) in fields {
            target.insert(key.clone(), value.clone());
        }
    }
    Json(character.clone()).into_response()
}

async fn create_character(
    State(state): State<FakeCollection>,
    Json(body): Json<Value>,
) -> Response {
    let mut guard = state.inner.lock().await;
    guard.requests.push(RecordedRequest {
        method: "POST",
        path: "/characters".into(),
        body: Some(body.clone()),
    });
    if guard.fail_writes {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    guard.next_id += 1;
    let mut created = body;
    if let Some(fields) = created.as_object_mut() {
        fields.insert("id".into(), json!(guard.next_id));
    }
    guard.characters.push(created.clone());
    (StatusCode::CREATED, Json(created)).into_response()
}

/// Serves `seed` under `/characters` and returns the collection url.
pub(crate) async fn spawn_collection_server(
    seed: Vec<Value>,
) -> anyhow::Result<(String, FakeCollection)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let next_id = seed
        .iter()
        .filter_map(|character| character["id"].as_i64())
        .max()
        .unwrap_or(0);
    let collection = FakeCollection {
        inner: Arc::new(Mutex::new(CollectionState {
            characters: seed,
            next_id,
            ..CollectionState::default()
        })),
    };

    let app = Router::new()
        .route("/characters", get(list_characters).post(create_character))
        .route(
            "/characters/:id",
            get(get_character).patch(patch_character),
        )
        .with_state(collection.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}/characters"), collection))
}

/// A collection url nothing is listening on.
pub(crate) async fn unreachable_collection_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}/characters")
}

pub(crate) fn rick_and_morty() -> Vec<Value> {
    vec![
        json!({ "id": 1, "name": "Rick", "image": "https://example.test/rick.png", "votes": 5 }),
        json!({ "id": 2, "name": "Morty", "image": "https://example.test/morty.png", "votes": 0 }),
    ]
}
