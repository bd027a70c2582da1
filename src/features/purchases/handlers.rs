use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::auth::model::CurrentUser;
use crate::features::purchases::dtos::{
    CreatePurchaseDto, PurchaseListQuery, PurchaseResponseDto, UpdatePurchaseStatusDto,
};
use crate::features::purchases::service::PurchaseService;
use crate::shared::types::{ApiResponse, Pagination};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseListResponseDto {
    pub purchases: Vec<PurchaseResponseDto>,
    pub pagination: Pagination,
}

/// Create a pending purchase for a paid file
#[utoipa::path(
    post,
    path = "/purchases",
    tag = "purchases",
    request_body = CreatePurchaseDto,
    responses(
        (status = 201, description = "Purchase created", body = ApiResponse<PurchaseResponseDto>),
        (status = 400, description = "Free file or invalid request"),
        (status = 404, description = "File not found"),
        (status = 409, description = "File already purchased")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_purchase(
    current_user: CurrentUser,
    State(service): State<Arc<PurchaseService>>,
    AppJson(dto): AppJson<CreatePurchaseDto>,
) -> Result<(StatusCode, Json<ApiResponse<PurchaseResponseDto>>)> {
    let purchase = service.create(current_user.id, dto.file_id).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(purchase))))
}

/// List purchases; admins see all, others their own
#[utoipa::path(
    get,
    path = "/purchases",
    tag = "purchases",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("limit" = Option<i64>, Query, description = "Items per page"),
        ("user_id" = Option<Uuid>, Query, description = "Filter by buyer (admin only)")
    ),
    responses(
        (status = 200, description = "Paged purchases", body = ApiResponse<PurchaseListResponseDto>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_purchases(
    current_user: CurrentUser,
    State(service): State<Arc<PurchaseService>>,
    Query(query): Query<PurchaseListQuery>,
) -> Result<Json<ApiResponse<PurchaseListResponseDto>>> {
    let (purchases, pagination) = service.list(&current_user, query).await?;
    Ok(Json(ApiResponse::success(PurchaseListResponseDto {
        purchases,
        pagination,
    })))
}

/// Get a purchase by id (own or admin)
#[utoipa::path(
    get,
    path = "/purchases/{id}",
    tag = "purchases",
    params(("id" = Uuid, Path, description = "Purchase id")),
    responses(
        (status = 200, description = "Purchase found", body = ApiResponse<PurchaseResponseDto>),
        (status = 404, description = "Purchase not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_purchase(
    current_user: CurrentUser,
    State(service): State<Arc<PurchaseService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PurchaseResponseDto>>> {
    let purchase = service.get(&current_user, id).await?;
    Ok(Json(ApiResponse::success(purchase)))
}

/// Update purchase status (admin)
#[utoipa::path(
    put,
    path = "/purchases/{id}/status",
    tag = "purchases",
    params(("id" = Uuid, Path, description = "Purchase id")),
    request_body = UpdatePurchaseStatusDto,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<PurchaseResponseDto>),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Purchase not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_purchase_status(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<PurchaseService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdatePurchaseStatusDto>,
) -> Result<Json<ApiResponse<PurchaseResponseDto>>> {
    let purchase = service.update_status(id, &dto.status).await?;
    Ok(Json(ApiResponse::success(purchase)))
}

/// Delete a purchase (admin; completed purchases are protected)
#[utoipa::path(
    delete,
    path = "/purchases/{id}",
    tag = "purchases",
    params(("id" = Uuid, Path, description = "Purchase id")),
    responses(
        (status = 200, description = "Purchase deleted"),
        (status = 404, description = "Purchase not found"),
        (status = 409, description = "Completed purchases cannot be deleted")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_purchase(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<PurchaseService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::<()>::message(
        "Purchase deleted successfully",
    )))
}
