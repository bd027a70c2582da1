use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::auth::model::CurrentUser;
use crate::features::payments::dtos::{
    CreatePaymentDto, CreatePaymentMethodDto, PaymentInvoiceDto, PaymentMethodResponseDto,
    PaymentResponseDto, UpdatePaymentMethodDto, VerifyPaymentDto,
};
use crate::features::payments::service::PaymentService;
use crate::shared::types::{ApiResponse, Pagination, PaginationQuery};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentListResponseDto {
    pub payments: Vec<PaymentResponseDto>,
    pub pagination: Pagination,
}

// =============================================================================
// PAYMENT METHODS
// =============================================================================

/// List active payment methods
#[utoipa::path(
    get,
    path = "/payment-methods",
    tag = "payments",
    responses(
        (status = 200, description = "Active payment methods", body = ApiResponse<Vec<PaymentMethodResponseDto>>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_payment_methods(
    _current_user: CurrentUser,
    State(service): State<Arc<PaymentService>>,
) -> Result<Json<ApiResponse<Vec<PaymentMethodResponseDto>>>> {
    let methods = service.list_active_methods().await?;
    Ok(Json(ApiResponse::success(methods)))
}

/// List all payment methods including inactive (admin)
#[utoipa::path(
    get,
    path = "/payment-methods/all",
    tag = "payments",
    responses(
        (status = 200, description = "All payment methods", body = ApiResponse<Vec<PaymentMethodResponseDto>>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_all_payment_methods(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<PaymentService>>,
) -> Result<Json<ApiResponse<Vec<PaymentMethodResponseDto>>>> {
    let methods = service.list_all_methods().await?;
    Ok(Json(ApiResponse::success(methods)))
}

/// Create a payment method (admin)
#[utoipa::path(
    post,
    path = "/payment-methods",
    tag = "payments",
    request_body = CreatePaymentMethodDto,
    responses(
        (status = 201, description = "Payment method created", body = ApiResponse<PaymentMethodResponseDto>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_payment_method(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<PaymentService>>,
    AppJson(dto): AppJson<CreatePaymentMethodDto>,
) -> Result<(StatusCode, Json<ApiResponse<PaymentMethodResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let method = service.create_method(dto).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(method))))
}

/// Update a payment method (admin)
#[utoipa::path(
    put,
    path = "/payment-methods/{id}",
    tag = "payments",
    params(("id" = Uuid, Path, description = "Payment method id")),
    request_body = UpdatePaymentMethodDto,
    responses(
        (status = 200, description = "Payment method updated", body = ApiResponse<PaymentMethodResponseDto>),
        (status = 404, description = "Payment method not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_payment_method(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<PaymentService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdatePaymentMethodDto>,
) -> Result<Json<ApiResponse<PaymentMethodResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let method = service.update_method(id, dto).await?;
    Ok(Json(ApiResponse::success(method)))
}

/// Delete a payment method (admin)
#[utoipa::path(
    delete,
    path = "/payment-methods/{id}",
    tag = "payments",
    params(("id" = Uuid, Path, description = "Payment method id")),
    responses(
        (status = 200, description = "Payment method deleted"),
        (status = 404, description = "Payment method not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_payment_method(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<PaymentService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete_method(id).await?;
    Ok(Json(ApiResponse::<()>::message(
        "Payment method deleted successfully",
    )))
}

// =============================================================================
// PAYMENTS
// =============================================================================

/// Open a pending payment for a paid file
#[utoipa::path(
    post,
    path = "/payments",
    tag = "payments",
    request_body = CreatePaymentDto,
    responses(
        (status = 201, description = "Payment opened", body = ApiResponse<PaymentResponseDto>),
        (status = 400, description = "Free file or invalid payment method"),
        (status = 404, description = "File not found"),
        (status = 409, description = "File already purchased")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_payment(
    current_user: CurrentUser,
    State(service): State<Arc<PaymentService>>,
    AppJson(dto): AppJson<CreatePaymentDto>,
) -> Result<(StatusCode, Json<ApiResponse<PaymentResponseDto>>)> {
    let payment = service.create(current_user.id, dto).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(payment))))
}

/// Verify a pending payment (admin)
#[utoipa::path(
    post,
    path = "/payments/{id}/verify",
    tag = "payments",
    params(("id" = Uuid, Path, description = "Payment id")),
    request_body = VerifyPaymentDto,
    responses(
        (status = 200, description = "Payment verified", body = ApiResponse<PaymentResponseDto>),
        (status = 400, description = "Non-terminal target status"),
        (status = 404, description = "Payment not found"),
        (status = 409, description = "Payment already processed")
    ),
    security(("bearer_auth" = []))
)]
pub async fn verify_payment(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<PaymentService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<VerifyPaymentDto>,
) -> Result<Json<ApiResponse<PaymentResponseDto>>> {
    let payment = service.verify(id, dto).await?;
    Ok(Json(ApiResponse::success(payment)))
}

/// List own payments
#[utoipa::path(
    get,
    path = "/payments",
    tag = "payments",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Paged payments", body = ApiResponse<PaymentListResponseDto>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_payments(
    current_user: CurrentUser,
    State(service): State<Arc<PaymentService>>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<PaymentListResponseDto>>> {
    let (payments, pagination) = service.list(current_user.id, &query).await?;
    Ok(Json(ApiResponse::success(PaymentListResponseDto {
        payments,
        pagination,
    })))
}

/// Get a payment by id (own or admin)
#[utoipa::path(
    get,
    path = "/payments/{id}",
    tag = "payments",
    params(("id" = Uuid, Path, description = "Payment id")),
    responses(
        (status = 200, description = "Payment found", body = ApiResponse<PaymentResponseDto>),
        (status = 404, description = "Payment not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_payment(
    current_user: CurrentUser,
    State(service): State<Arc<PaymentService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PaymentResponseDto>>> {
    let payment = service.get(&current_user, id).await?;
    Ok(Json(ApiResponse::success(payment)))
}

/// Render the invoice view for a payment (own or admin)
#[utoipa::path(
    get,
    path = "/payments/{id}/invoice",
    tag = "payments",
    params(("id" = Uuid, Path, description = "Payment id")),
    responses(
        (status = 200, description = "Invoice view", body = ApiResponse<PaymentInvoiceDto>),
        (status = 404, description = "Payment not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_payment_invoice(
    current_user: CurrentUser,
    State(service): State<Arc<PaymentService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PaymentInvoiceDto>>> {
    let invoice = service.invoice(&current_user, id).await?;
    Ok(Json(ApiResponse::success(invoice)))
}
