use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::analytics::handlers;
use crate::features::analytics::service::AnalyticsService;

pub fn protected_routes(service: Arc<AnalyticsService>) -> Router {
    Router::new()
        .route("/analytics/dashboard", get(handlers::dashboard))
        .route("/analytics/files/{id}", get(handlers::file_analytics))
        .route("/analytics/users/{id}", get(handlers::user_analytics))
        .with_state(service)
}
