use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
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
use crate::features::users::dtos::{
    ChangePasswordDto, UpdateProfileDto, UserListItemDto, UserProfileDto,
};
use crate::features::users::service::UserService;
use crate::shared::types::{ApiResponse, Pagination, PaginationQuery};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponseDto {
    pub users: Vec<UserListItemDto>,
    pub pagination: Pagination,
}

/// Own profile
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "users",
    responses(
        (status = 200, description = "Profile", body = ApiResponse<UserProfileDto>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_profile(
    current_user: CurrentUser,
    State(service): State<Arc<UserService>>,
) -> Result<Json<ApiResponse<UserProfileDto>>> {
    let profile = service.profile(current_user.id).await?;
    Ok(Json(ApiResponse::success(profile)))
}

/// Update own profile
#[utoipa::path(
    put,
    path = "/users/me",
    tag = "users",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<UserProfileDto>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_profile(
    current_user: CurrentUser,
    State(service): State<Arc<UserService>>,
    AppJson(dto): AppJson<UpdateProfileDto>,
) -> Result<Json<ApiResponse<UserProfileDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let profile = service.update_profile(current_user.id, dto).await?;
    Ok(Json(ApiResponse::success(profile)))
}

/// Change own password
#[utoipa::path(
    put,
    path = "/users/me/password",
    tag = "users",
    request_body = ChangePasswordDto,
    responses(
        (status = 200, description = "Password changed"),
        (status = 401, description = "Current password is incorrect")
    ),
    security(("bearer_auth" = []))
)]
pub async fn change_password(
    current_user: CurrentUser,
    State(service): State<Arc<UserService>>,
    AppJson(dto): AppJson<ChangePasswordDto>,
) -> Result<Json<ApiResponse<()>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    service.change_password(current_user.id, dto).await?;
    Ok(Json(ApiResponse::<()>::message(
        "Password changed successfully",
    )))
}

/// List users (admin)
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Paged users", body = ApiResponse<UserListResponseDto>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<UserService>>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<UserListResponseDto>>> {
    let (users, pagination) = service.list(&query).await?;
    Ok(Json(ApiResponse::success(UserListResponseDto {
        users,
        pagination,
    })))
}

/// Delete a user (admin)
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<UserService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::<()>::message("User deleted successfully")))
}
