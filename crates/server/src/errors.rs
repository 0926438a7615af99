use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorBody;
use service::errors::StoreError;
use service::resources::Resource;
use service::store::Operation;
use tracing::{error, warn};

/// A failed collection operation, rendered as `{"message": ...}`.
#[derive(Debug)]
pub struct ApiError {
    pub resource: Resource,
    pub op: Operation,
    pub error: StoreError,
}

impl ApiError {
    pub fn new(resource: Resource, op: Operation, error: StoreError) -> Self {
        Self { resource, op, error }
    }

    pub fn status(&self) -> StatusCode {
        match self.error {
            StoreError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match self.error {
            StoreError::NotFound(_) => self.resource.not_found_message(),
            StoreError::InvalidInput(_) => self.resource.invalid_input_message(self.op),
            StoreError::Read { .. } | StoreError::Parse { .. } => self.resource.read_failed_message(),
            StoreError::CorruptCollection { .. } => self.resource.corrupt_message(),
            StoreError::Write { .. } => self.resource.write_failed_message(self.op),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let resource = self.resource.name();
        let operation = self.op.as_str();
        if self.error.is_client_error() {
            warn!(resource, operation, status = status.as_u16(), error = %self.error, "request rejected");
        } else {
            error!(resource, operation, status = status.as_u16(), error = %self.error, "collection operation failed");
        }
        (status, Json(ErrorBody::new(self.message()))).into_response()
    }
}
