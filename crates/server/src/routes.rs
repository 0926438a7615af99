pub mod records;

use std::sync::Arc;

use axum::{response::Redirect, routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;
use service::resources::Catalog;

use crate::openapi;
use records::RecordState;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: one record router per catalog entry,
/// plus health, the OpenAPI document and Swagger UI.
///
/// `/api-docs` redirects to the UI; the document itself is at
/// `/api-docs/openapi.json`.
pub fn build_router(catalog: &Catalog, cors: CorsLayer) -> Router {
    let mut app = Router::new()
        .route("/health", get(health))
        .route("/api-docs", get(|| async { Redirect::temporary("/swagger-ui/") }))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi::build(catalog)));

    for (resource, store) in catalog.iter() {
        let state = RecordState { resource, store: Arc::clone(store) };
        app = app.nest(resource.mount_path(), records::router(state));
    }

    app.layer(cors).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
            // 5xx responses
            .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
    )
}
