use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::categories::handlers;
use crate::features::categories::service::CategoryService;

/// Public read access to the category catalog
pub fn public_routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route("/categories", get(handlers::list_categories))
        .route("/categories/{id}", get(handlers::get_category))
        .with_state(service)
}

/// Admin mutations, mounted behind the auth middleware
pub fn admin_routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route("/categories", post(handlers::create_category))
        .route(
            "/categories/{id}",
            put(handlers::update_category).delete(handlers::delete_category),
        )
        .with_state(service)
}
