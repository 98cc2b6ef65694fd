#![forbid(unsafe_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde::Serialize;
use serde_json::json;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tp_core::{PayloadMode, TaskPayload, validate};
use tp_storage::{CreateTaskRequest, StoreError, TaskStore, UpdateTaskRequest};
use tracing::error;

/// Shared router state: the single task store behind a mutex. Handlers hold
/// the lock only for the duration of one synchronous store call.
pub struct AppState {
    store: Mutex<TaskStore>,
}

impl AppState {
    pub fn new(store: TaskStore) -> Arc<Self> {
        Arc::new(Self {
            store: Mutex::new(store),
        })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/tasks/:id",
            get(get_task).put(update_task).delete(remove_task),
        )
        .with_state(state)
}

async fn health() -> Response {
    let timestamp = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default();
    Json(json!({
        "status": "ok",
        "timestamp": timestamp,
        "version": env!("CARGO_PKG_VERSION"),
    }))
    .into_response()
}

async fn list_tasks(State(state): State<Arc<AppState>>) -> Response {
    let store = match lock_store(&state) {
        Ok(store) => store,
        Err(response) => return response,
    };
    match store.find_all() {
        Ok(tasks) => success(StatusCode::OK, tasks),
        Err(err) => internal_error("list tasks", err),
    }
}

async fn get_task(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    let Some(id) = parse_id(&id) else {
        return malformed_id();
    };
    let store = match lock_store(&state) {
        Ok(store) => store,
        Err(response) => return response,
    };
    match store.find_by_id(id) {
        Ok(Some(task)) => success(StatusCode::OK, task),
        Ok(None) => not_found(),
        Err(err) => internal_error("get task", err),
    }
}

async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TaskPayload>,
) -> Response {
    let errors = validate(&payload, PayloadMode::Create);
    if !errors.is_empty() {
        return validation_failure(errors);
    }

    let mut store = match lock_store(&state) {
        Ok(store) => store,
        Err(response) => return response,
    };
    match store.create(CreateTaskRequest::from_payload(payload)) {
        Ok(task) => success(StatusCode::CREATED, task),
        Err(err) => internal_error("create task", err),
    }
}

async fn update_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<TaskPayload>,
) -> Response {
    let Some(id) = parse_id(&id) else {
        return malformed_id();
    };

    let errors = validate(&payload, PayloadMode::Update);
    if !errors.is_empty() {
        return validation_failure(errors);
    }

    let mut store = match lock_store(&state) {
        Ok(store) => store,
        Err(response) => return response,
    };
    match store.update(id, UpdateTaskRequest::from_payload(payload)) {
        Ok(Some(task)) => success(StatusCode::OK, task),
        Ok(None) => not_found(),
        Err(err) => internal_error("update task", err),
    }
}

async fn remove_task(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    let Some(id) = parse_id(&id) else {
        return malformed_id();
    };
    let mut store = match lock_store(&state) {
        Ok(store) => store,
        Err(response) => return response,
    };
    match store.remove(id) {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => not_found(),
        Err(err) => internal_error("remove task", err),
    }
}

fn parse_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok()
}

fn lock_store(state: &AppState) -> Result<MutexGuard<'_, TaskStore>, Response> {
    state.store.lock().map_err(|_| {
        error!("task store mutex poisoned");
        failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!("Unexpected error occurred."),
        )
    })
}

fn success<T: Serialize>(status: StatusCode, data: T) -> Response {
    (status, Json(json!({ "success": true, "data": data }))).into_response()
}

fn failure(status: StatusCode, error: serde_json::Value) -> Response {
    (status, Json(json!({ "success": false, "error": error }))).into_response()
}

fn validation_failure(errors: Vec<String>) -> Response {
    failure(StatusCode::BAD_REQUEST, json!(errors))
}

fn malformed_id() -> Response {
    failure(StatusCode::BAD_REQUEST, json!("Task ID must be a number."))
}

fn not_found() -> Response {
    failure(StatusCode::NOT_FOUND, json!("Task not found."))
}

fn internal_error(operation: &str, err: StoreError) -> Response {
    error!("{operation} failed: {err}");
    failure(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!("Unexpected error occurred."),
    )
}
