use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::auth::guards::RequireAdmin;
use crate::features::auth::model::CurrentUser;
use crate::features::invoices::dtos::{GeneratedInvoiceDto, InvoiceDto, InvoiceListQuery};
use crate::features::invoices::service::InvoiceService;
use crate::shared::types::{ApiResponse, Pagination};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceListResponseDto {
    pub invoices: Vec<InvoiceDto>,
    pub pagination: Pagination,
}

/// List invoices across all purchases (admin)
#[utoipa::path(
    get,
    path = "/invoices",
    tag = "invoices",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("limit" = Option<i64>, Query, description = "Items per page"),
        ("status" = Option<String>, Query, description = "Filter by purchase status"),
        ("start_date" = Option<String>, Query, description = "Inclusive start date (YYYY-MM-DD)"),
        ("end_date" = Option<String>, Query, description = "Inclusive end date (YYYY-MM-DD)")
    ),
    responses(
        (status = 200, description = "Paged invoices", body = ApiResponse<InvoiceListResponseDto>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_invoices(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<InvoiceService>>,
    Query(query): Query<InvoiceListQuery>,
) -> Result<Json<ApiResponse<InvoiceListResponseDto>>> {
    let (invoices, pagination) = service.list(query).await?;
    Ok(Json(ApiResponse::success(InvoiceListResponseDto {
        invoices,
        pagination,
    })))
}

/// Get the invoice projection for a purchase (own or admin)
#[utoipa::path(
    get,
    path = "/invoices/{id}",
    tag = "invoices",
    params(("id" = Uuid, Path, description = "Purchase id")),
    responses(
        (status = 200, description = "Invoice found", body = ApiResponse<InvoiceDto>),
        (status = 404, description = "Invoice not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_invoice(
    current_user: CurrentUser,
    State(service): State<Arc<InvoiceService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<InvoiceDto>>> {
    let invoice = service.get(&current_user, id).await?;
    Ok(Json(ApiResponse::success(invoice)))
}

/// Generate the full invoice with site settings and tax (admin)
#[utoipa::path(
    post,
    path = "/invoices/{purchase_id}/generate",
    tag = "invoices",
    params(("purchase_id" = Uuid, Path, description = "Purchase id")),
    responses(
        (status = 200, description = "Generated invoice", body = ApiResponse<GeneratedInvoiceDto>),
        (status = 404, description = "Invoice not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn generate_invoice(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<InvoiceService>>,
    Path(purchase_id): Path<Uuid>,
) -> Result<Json<ApiResponse<GeneratedInvoiceDto>>> {
    let invoice = service.generate(purchase_id).await?;
    Ok(Json(ApiResponse::success(invoice)))
}
