//! Handlers shared by every resource; one router instance per collection.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use service::errors::StoreError;
use service::record::{Document, Record};
use service::resources::Resource;
use service::store::{Operation, RecordStore};
use tracing::info;

use crate::errors::ApiError;

#[derive(Clone)]
pub struct RecordState {
    pub resource: Resource,
    pub store: Arc<dyn RecordStore<Document>>,
}

impl RecordState {
    fn fail(&self, op: Operation) -> impl FnOnce(StoreError) -> ApiError {
        let resource = self.resource;
        move |e| ApiError::new(resource, op, e)
    }
}

/// `GET /`, `POST /`, `GET|PUT|DELETE /:id` relative to the resource prefix.
pub fn router(state: RecordState) -> Router {
    Router::new()
        .route("/", get(list).post(create))
        .route("/:id", get(get_one).put(update).delete(delete))
        .with_state(state)
}

pub async fn list(State(state): State<RecordState>) -> Result<Json<Vec<Document>>, ApiError> {
    let records = state.store.list().await.map_err(state.fail(Operation::List))?;
    Ok(Json(records))
}

pub async fn get_one(
    State(state): State<RecordState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, ApiError> {
    let record = state.store.get(&id).await.map_err(state.fail(Operation::Get))?;
    Ok(Json(record))
}

pub async fn create(
    State(state): State<RecordState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    let candidate = Document::from_payload(&body).map_err(state.fail(Operation::Create))?;
    let record = state.store.create(candidate).await.map_err(state.fail(Operation::Create))?;
    info!(resource = state.resource.name(), id = ?record.id(), "created record");
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn update(
    State(state): State<RecordState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Document>, ApiError> {
    let patch = Document::from_payload(&body).map_err(state.fail(Operation::Update))?;
    let record = state.store.update(&id, patch).await.map_err(state.fail(Operation::Update))?;
    info!(resource = state.resource.name(), %id, "updated record");
    Ok(Json(record))
}

pub async fn delete(
    State(state): State<RecordState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.store.delete(&id).await.map_err(state.fail(Operation::Delete))?;
    info!(resource = state.resource.name(), %id, "deleted record");
    Ok(StatusCode::NO_CONTENT)
}
