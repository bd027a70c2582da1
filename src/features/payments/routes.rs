use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::features::payments::handlers;
use crate::features::payments::service::PaymentService;

/// All payment routes require authentication; admin checks live in the
/// handlers via the guard extractor.
pub fn protected_routes(service: Arc<PaymentService>) -> Router {
    Router::new()
        .route(
            "/payment-methods",
            get(handlers::list_payment_methods).post(handlers::create_payment_method),
        )
        .route(
            "/payment-methods/all",
            get(handlers::list_all_payment_methods),
        )
        .route(
            "/payment-methods/{id}",
            put(handlers::update_payment_method).delete(handlers::delete_payment_method),
        )
        .route(
            "/payments",
            get(handlers::list_payments).post(handlers::create_payment),
        )
        .route("/payments/{id}", get(handlers::get_payment))
        .route("/payments/{id}/verify", post(handlers::verify_payment))
        .route("/payments/{id}/invoice", get(handlers::get_payment_invoice))
        .with_state(service)
}
