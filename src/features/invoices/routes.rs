use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::invoices::handlers;
use crate::features::invoices::service::InvoiceService;

pub fn protected_routes(service: Arc<InvoiceService>) -> Router {
    Router::new()
        .route("/invoices", get(handlers::list_invoices))
        .route("/invoices/{id}", get(handlers::get_invoice))
        .route(
            "/invoices/{purchase_id}/generate",
            post(handlers::generate_invoice),
        )
        .with_state(service)
}
