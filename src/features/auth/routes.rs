use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::auth::handlers;
use crate::features::auth::service::AuthService;

/// Routes that require no authentication
pub fn public_routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/auth/register", post(handlers::register))
        .route("/auth/login", post(handlers::login))
        .route("/auth/forgot-password", post(handlers::forgot_password))
        .route("/auth/reset-password", post(handlers::reset_password))
        .route("/auth/verify-email/{token}", get(handlers::verify_email))
        .with_state(service)
}

/// Routes behind the bearer-auth middleware
pub fn protected_routes(service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/auth/me", get(handlers::get_me))
        .route("/auth/logout", post(handlers::logout))
        .with_state(service)
}
