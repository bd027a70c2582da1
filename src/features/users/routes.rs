use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use crate::features::users::handlers;
use crate::features::users::service::UserService;

pub fn protected_routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/users", get(handlers::list_users))
        .route(
            "/users/me",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .route("/users/me/password", put(handlers::change_password))
        .route("/users/{id}", axum::routing::delete(handlers::delete_user))
        .with_state(service)
}
