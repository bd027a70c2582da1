use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use crate::features::purchases::handlers;
use crate::features::purchases::service::PurchaseService;

/// All purchase routes require authentication; admin checks live in the
/// handlers via the guard extractor.
pub fn protected_routes(service: Arc<PurchaseService>) -> Router {
    Router::new()
        .route(
            "/purchases",
            get(handlers::list_purchases).post(handlers::create_purchase),
        )
        .route(
            "/purchases/{id}",
            get(handlers::get_purchase).delete(handlers::delete_purchase),
        )
        .route(
            "/purchases/{id}/status",
            put(handlers::update_purchase_status),
        )
        .with_state(service)
}
