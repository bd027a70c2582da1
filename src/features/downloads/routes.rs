use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::downloads::handlers;
use crate::features::downloads::service::DownloadService;

/// Delivery and history routes; all require authentication, free files
/// included.
pub fn protected_routes(service: Arc<DownloadService>) -> Router {
    Router::new()
        .route("/files/{id}/download", get(handlers::download_file))
        .route("/download/{file_id}", get(handlers::download_file_alias))
        .route("/download/history/me", get(handlers::download_history))
        .with_state(service)
}
