use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

/// Body of a create or update request.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CounterValue {
    pub current_value: i64,
}

/// Answer to a get of an existing key. `exists` is always `true`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Existing {
    pub exists: bool,
    pub key: String,
    pub namespace: String,
    pub current_value: i64,
}

/// Answer to a get of a missing key. `exists` is always `false`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Missing {
    pub exists: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Created {
    pub already_exists: bool,
    pub key: String,
    pub namespace: String,
    pub current_value: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Mutation {
    pub key: String,
    pub namespace: String,
    pub current_value: i64,
    pub previous_value: i64,
    pub success: bool,
}

pub const NOT_FOUND_BODY: &str = "counter not found";
pub const OVERFLOW_BODY: &str = "counter out of range";

pub type Db = Arc<RwLock<HashMap<(String, String), i64>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/{namespace}/{key}", post(create_counter).get(get_counter))
        .route("/{namespace}/{key}/increment", post(increment_counter))
        .route("/{namespace}/{key}/decrement", post(decrement_counter))
        .route("/{namespace}/{key}/update", post(update_counter))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// A missing or empty body starts the counter at zero.
async fn create_counter(
    State(db): State<Db>,
    Path((namespace, key)): Path<(String, String)>,
    body: Option<Json<CounterValue>>,
) -> (StatusCode, Json<Created>) {
    let initial = body.map(|Json(b)| b.current_value).unwrap_or(0);
    let mut counters = db.write().await;
    let id = (namespace.clone(), key.clone());
    if let Some(&current_value) = counters.get(&id) {
        return (
            StatusCode::OK,
            Json(Created {
                already_exists: true,
                key,
                namespace,
                current_value,
            }),
        );
    }
    counters.insert(id, initial);
    debug!(%namespace, %key, initial, "counter created");
    (
        StatusCode::CREATED,
        Json(Created {
            already_exists: false,
            key,
            namespace,
            current_value: initial,
        }),
    )
}

async fn get_counter(
    State(db): State<Db>,
    Path((namespace, key)): Path<(String, String)>,
) -> Response {
    let counters = db.read().await;
    match counters.get(&(namespace.clone(), key.clone())) {
        Some(&current_value) => Json(Existing {
            exists: true,
            key,
            namespace,
            current_value,
        })
        .into_response(),
        None => Json(Missing { exists: false }).into_response(),
    }
}

async fn increment_counter(
    State(db): State<Db>,
    Path((namespace, key)): Path<(String, String)>,
) -> Result<Json<Mutation>, (StatusCode, &'static str)> {
    mutate(&db, namespace, key, |v| v.checked_add(1)).await
}

async fn decrement_counter(
    State(db): State<Db>,
    Path((namespace, key)): Path<(String, String)>,
) -> Result<Json<Mutation>, (StatusCode, &'static str)> {
    mutate(&db, namespace, key, |v| v.checked_sub(1)).await
}

async fn update_counter(
    State(db): State<Db>,
    Path((namespace, key)): Path<(String, String)>,
    Json(input): Json<CounterValue>,
) -> Result<Json<Mutation>, (StatusCode, &'static str)> {
    mutate(&db, namespace, key, |_| Some(input.current_value)).await
}

/// `apply` returns `None` when the new value would leave the `i64` range;
/// the stored value is then left as it was.
async fn mutate(
    db: &Db,
    namespace: String,
    key: String,
    apply: impl FnOnce(i64) -> Option<i64>,
) -> Result<Json<Mutation>, (StatusCode, &'static str)> {
    let mut counters = db.write().await;
    let value = counters
        .get_mut(&(namespace.clone(), key.clone()))
        .ok_or((StatusCode::NOT_FOUND, NOT_FOUND_BODY))?;
    let previous_value = *value;
    *value = apply(previous_value).ok_or((StatusCode::BAD_REQUEST, OVERFLOW_BODY))?;
    debug!(%namespace, %key, previous_value, current_value = *value, "counter changed");
    Ok(Json(Mutation {
        current_value: *value,
        previous_value,
        key,
        namespace,
        success: true,
    }))
}
