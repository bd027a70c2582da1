use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::analytics::dtos::{DashboardDto, FileAnalyticsDto, UserAnalyticsDto};
use crate::features::analytics::service::AnalyticsService;
use crate::features::auth::guards::RequireAdmin;
use crate::shared::types::ApiResponse;

/// Marketplace dashboard (admin)
#[utoipa::path(
    get,
    path = "/analytics/dashboard",
    tag = "analytics",
    responses(
        (status = 200, description = "Dashboard aggregates", body = ApiResponse<DashboardDto>),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn dashboard(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<AnalyticsService>>,
) -> Result<Json<ApiResponse<DashboardDto>>> {
    let dashboard = service.dashboard().await?;
    Ok(Json(ApiResponse::success(dashboard)))
}

/// Per-file purchase analytics (admin)
#[utoipa::path(
    get,
    path = "/analytics/files/{id}",
    tag = "analytics",
    params(("id" = Uuid, Path, description = "File id")),
    responses(
        (status = 200, description = "File analytics", body = ApiResponse<FileAnalyticsDto>),
        (status = 404, description = "File not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn file_analytics(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<AnalyticsService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FileAnalyticsDto>>> {
    let analytics = service.file_analytics(id).await?;
    Ok(Json(ApiResponse::success(analytics)))
}

/// Per-user spend analytics (admin)
#[utoipa::path(
    get,
    path = "/analytics/users/{id}",
    tag = "analytics",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User analytics", body = ApiResponse<UserAnalyticsDto>),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn user_analytics(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<AnalyticsService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserAnalyticsDto>>> {
    let analytics = service.user_analytics(id).await?;
    Ok(Json(ApiResponse::success(analytics)))
}
