use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::search::handlers;
use crate::features::search::service::SearchService;

/// Search is public; no authentication required.
pub fn public_routes(service: Arc<SearchService>) -> Router {
    Router::new()
        .route("/search", get(handlers::search))
        .route("/search/suggestions", get(handlers::suggestions))
        .route("/search/popular", get(handlers::popular))
        .with_state(service)
}
