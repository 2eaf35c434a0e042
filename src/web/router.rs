//! Router configuration for Web API.

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers::{
    assign_entry, clear_primary, clear_staging, create_folder, deploy, deploy_status, get_plan,
    get_staging, remove_entry, remove_folder, upload_entries, upload_primary, AppState,
};
use super::middleware::create_cors_layer;

/// Multipart overhead allowed on top of the per-file limit.
const BODY_LIMIT_SLACK: usize = 1024 * 1024;

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    let body_limit = usize::try_from(app_state.max_upload_size)
        .unwrap_or(usize::MAX)
        .saturating_add(BODY_LIMIT_SLACK);

    let staging_routes = Router::new()
        .route("/", get(get_staging).delete(clear_staging))
        .route("/primary", post(upload_primary).delete(clear_primary))
        .route("/entries", post(upload_entries))
        .route("/entries/:name", delete(remove_entry))
        .route("/entries/:name/location", put(assign_entry))
        .route("/folders", post(create_folder))
        .route("/folders/*path", delete(remove_folder))
        .route("/plan", get(get_plan))
        .layer(DefaultBodyLimit::max(body_limit));

    let deploy_routes = Router::new()
        .route("/", post(deploy))
        .route("/status", get(deploy_status));

    let api_routes = Router::new()
        .nest("/staging", staging_routes)
        .nest("/deploy", deploy_routes);

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Create a router serving a built front end, if the directory exists.
pub fn create_static_router(static_path: &str) -> Option<Router> {
    if !Path::new(static_path).is_dir() {
        tracing::warn!("Static directory not found: {}", static_path);
        return None;
    }
    Some(Router::new().fallback_service(ServeDir::new(static_path)))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
