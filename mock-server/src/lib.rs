//! In-memory stand-in for the identity server's `/api/clients` endpoints.
//!
//! Client documents are stored as raw JSON keyed by `id` and listed in id
//! order. Validation is limited to what the real server reports to callers:
//! a missing id, a duplicate id, and an unknown id.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::{net::TcpListener, sync::RwLock};

pub const DEFAULT_TAKE: usize = 20;

/// Listing projection returned by `GET /api/clients`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClientSummary {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceSet<T> {
    pub start: usize,
    pub size: usize,
    pub total_size: usize,
    pub items: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub skip: Option<usize>,
    pub take: Option<usize>,
}

pub type Db = Arc<RwLock<BTreeMap<String, Value>>>;

pub fn app() -> Router {
    app_with(Db::default())
}

/// Router over a caller-owned store, so tests can seed or inspect it.
pub fn app_with(db: Db) -> Router {
    Router::new()
        .route("/api/clients", get(list_clients).post(register_client))
        .route(
            "/api/clients/{id}",
            get(get_client).put(modify_client).delete(unregister_client),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn client_id(document: &Value) -> Option<&str> {
    document
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
}

fn summarize(document: &Value) -> ClientSummary {
    ClientSummary {
        id: client_id(document).unwrap_or_default().to_string(),
        name: document.get("name").and_then(Value::as_str).map(str::to_string),
        enabled: document.get("enabled").and_then(Value::as_bool),
    }
}

async fn list_clients(
    State(db): State<Db>,
    Query(query): Query<ListQuery>,
) -> Json<ResourceSet<ClientSummary>> {
    let start = query.skip.unwrap_or(0);
    let size = match query.take {
        None | Some(0) => DEFAULT_TAKE,
        Some(take) => take,
    };
    tracing::debug!(start, size, "listing clients");

    let clients = db.read().await;
    let items = clients.values().skip(start).take(size).map(summarize).collect();
    Json(ResourceSet {
        start,
        size,
        total_size: clients.len(),
        items,
    })
}

async fn get_client(State(db): State<Db>, Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
    let clients = db.read().await;
    clients.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn register_client(
    State(db): State<Db>,
    Json(document): Json<Value>,
) -> Result<StatusCode, (StatusCode, &'static str)> {
    let id = client_id(&document)
        .ok_or((StatusCode::BAD_REQUEST, "id required"))?
        .to_string();
    tracing::debug!(%id, "registering client");

    let mut clients = db.write().await;
    if clients.contains_key(&id) {
        return Err((StatusCode::CONFLICT, "client already exists"));
    }
    clients.insert(id, document);
    Ok(StatusCode::CREATED)
}

async fn modify_client(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(document): Json<Value>,
) -> Result<StatusCode, (StatusCode, &'static str)> {
    let body_id = client_id(&document).ok_or((StatusCode::BAD_REQUEST, "id required"))?;
    if body_id != id {
        return Err((StatusCode::BAD_REQUEST, "id does not match the resource"));
    }
    tracing::debug!(%id, "replacing client");

    let mut clients = db.write().await;
    let stored = clients.get_mut(&id).ok_or((StatusCode::NOT_FOUND, "client not found"))?;
    *stored = document;
    Ok(StatusCode::OK)
}

async fn unregister_client(
    State(db): State<Db>,
    Path(id): Path<String>,
) -> Result<StatusCode, StatusCode> {
    tracing::debug!(%id, "unregistering client");
    let mut clients = db.write().await;
    clients.remove(&id).map(|_| StatusCode::NO_CONTENT).ok_or(StatusCode::NOT_FOUND)
}
