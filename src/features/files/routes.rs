use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::files::handlers;
use crate::features::files::service::FileService;

/// Public catalog browsing
pub fn public_routes(service: Arc<FileService>) -> Router {
    Router::new()
        .route("/files", get(handlers::list_files))
        .route("/files/{id}", get(handlers::get_file))
        .with_state(service)
}

/// Admin catalog management, mounted behind the auth middleware
pub fn admin_routes(service: Arc<FileService>) -> Router {
    Router::new()
        .route("/files", post(handlers::create_file))
        .route(
            "/files/{id}",
            put(handlers::update_file).delete(handlers::delete_file),
        )
        .with_state(service)
}
