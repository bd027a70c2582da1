use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{
    AuthResponseDto, ForgotPasswordDto, LoginRequestDto, MeResponseDto, RegisterRequestDto,
    ResetPasswordDto,
};
use crate::features::auth::model::CurrentUser;
use crate::features::auth::service::AuthService;
use crate::shared::types::ApiResponse;

/// Register a new account
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "auth",
    request_body = RegisterRequestDto,
    responses(
        (status = 201, description = "User registered"),
        (status = 400, description = "Validation error or duplicate email")
    )
)]
pub async fn register(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<RegisterRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<()>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    service.register(dto).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::<()>::message("User registered successfully")),
    ))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Logged in", body = ApiResponse<AuthResponseDto>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<Json<ApiResponse<AuthResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let response = service.login(dto).await?;
    Ok(Json(ApiResponse::success(response)))
}

/// Request a password reset token
#[utoipa::path(
    post,
    path = "/auth/forgot-password",
    tag = "auth",
    request_body = ForgotPasswordDto,
    responses(
        (status = 200, description = "Reset instructions issued"),
        (status = 404, description = "No user with this email")
    )
)]
pub async fn forgot_password(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<ForgotPasswordDto>,
) -> Result<Json<ApiResponse<()>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    service.forgot_password(&dto.email).await?;
    Ok(Json(ApiResponse::<()>::message(
        "Password reset instructions sent to your email",
    )))
}

/// Reset password with a previously issued token
#[utoipa::path(
    post,
    path = "/auth/reset-password",
    tag = "auth",
    request_body = ResetPasswordDto,
    responses(
        (status = 200, description = "Password reset"),
        (status = 400, description = "Invalid or expired reset token")
    )
)]
pub async fn reset_password(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<ResetPasswordDto>,
) -> Result<Json<ApiResponse<()>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    service.reset_password(&dto.token, &dto.password).await?;
    Ok(Json(ApiResponse::<()>::message(
        "Password has been reset successfully",
    )))
}

/// Verify an email address
#[utoipa::path(
    get,
    path = "/auth/verify-email/{token}",
    tag = "auth",
    params(("token" = String, Path, description = "Verification token")),
    responses(
        (status = 200, description = "Email verified"),
        (status = 400, description = "Invalid verification token")
    )
)]
pub async fn verify_email(
    State(service): State<Arc<AuthService>>,
    Path(token): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    service.verify_email(&token).await?;
    Ok(Json(ApiResponse::<()>::message("Email verified successfully")))
}

/// Current user's profile
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Current user", body = ApiResponse<MeResponseDto>),
        (status = 401, description = "Authentication required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_me(
    user: CurrentUser,
    State(service): State<Arc<AuthService>>,
) -> Result<Json<ApiResponse<MeResponseDto>>> {
    let me = service.me(&user).await?;
    Ok(Json(ApiResponse::success(me)))
}

/// Log out (stateless tokens; the client discards the token)
#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    responses((status = 200, description = "Logged out")),
    security(("bearer_auth" = []))
)]
pub async fn logout(user: CurrentUser) -> Json<ApiResponse<()>> {
    tracing::info!("User {} logged out", user.email);
    Json(ApiResponse::<()>::message("Logged out successfully"))
}
