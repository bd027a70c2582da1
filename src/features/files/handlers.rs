use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::guards::RequireAdmin;
use crate::features::files::dtos::{CreateFileDto, FileListQuery, FileResponseDto, UpdateFileDto};
use crate::features::files::service::{FileService, UploadedAsset};
use crate::shared::types::{ApiResponse, Pagination};

/// Paged listing payload
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileListResponseDto {
    pub files: Vec<FileResponseDto>,
    pub pagination: Pagination,
}

/// List catalog files
#[utoipa::path(
    get,
    path = "/files",
    tag = "files",
    params(
        ("page" = Option<i64>, Query, description = "Page number"),
        ("limit" = Option<i64>, Query, description = "Items per page"),
        ("category" = Option<Uuid>, Query, description = "Filter by category id"),
        ("is_free" = Option<bool>, Query, description = "Filter by free/paid")
    ),
    responses(
        (status = 200, description = "Paged file listing", body = ApiResponse<FileListResponseDto>)
    )
)]
pub async fn list_files(
    State(service): State<Arc<FileService>>,
    Query(query): Query<FileListQuery>,
) -> Result<Json<ApiResponse<FileListResponseDto>>> {
    let (files, pagination) = service.list(query).await?;
    Ok(Json(ApiResponse::success(FileListResponseDto {
        files,
        pagination,
    })))
}

/// Get file by id
#[utoipa::path(
    get,
    path = "/files/{id}",
    tag = "files",
    params(("id" = Uuid, Path, description = "File id")),
    responses(
        (status = 200, description = "File found", body = ApiResponse<FileResponseDto>),
        (status = 404, description = "File not found")
    )
)]
pub async fn get_file(
    State(service): State<Arc<FileService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<FileResponseDto>>> {
    let file = service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(file)))
}

/// Upload a new file (admin, multipart form)
#[utoipa::path(
    post,
    path = "/files",
    tag = "files",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File created", body = ApiResponse<FileResponseDto>),
        (status = 400, description = "Missing file part or invalid metadata"),
        (status = 403, description = "Admin access required")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_file(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<FileService>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<FileResponseDto>>)> {
    let (dto, asset) = parse_create_form(multipart).await?;
    let file = service.create(dto, asset).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(file))))
}

/// Update file metadata and optionally replace the asset (admin)
#[utoipa::path(
    put,
    path = "/files/{id}",
    tag = "files",
    params(("id" = Uuid, Path, description = "File id")),
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File updated", body = ApiResponse<FileResponseDto>),
        (status = 404, description = "File not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_file(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<FileService>>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<ApiResponse<FileResponseDto>>> {
    let (dto, replacement) = parse_update_form(multipart).await?;
    let file = service.update(id, dto, replacement).await?;
    Ok(Json(ApiResponse::success(file)))
}

/// Delete a file and its stored asset (admin)
#[utoipa::path(
    delete,
    path = "/files/{id}",
    tag = "files",
    params(("id" = Uuid, Path, description = "File id")),
    responses(
        (status = 200, description = "File deleted"),
        (status = 404, description = "File not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_file(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<FileService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::<()>::message("File deleted successfully")))
}

// =============================================================================
// MULTIPART PARSING
// =============================================================================

struct FormAccumulator {
    title: Option<String>,
    description: Option<String>,
    category_id: Option<Uuid>,
    price: Option<Decimal>,
    is_free: Option<bool>,
    preview_url: Option<String>,
    is_downloadable: Option<bool>,
    download_limit_days: Option<i32>,
    asset: Option<UploadedAsset>,
}

impl FormAccumulator {
    fn empty() -> Self {
        Self {
            title: None,
            description: None,
            category_id: None,
            price: None,
            is_free: None,
            preview_url: None,
            is_downloadable: None,
            download_limit_days: None,
            asset: None,
        }
    }
}

async fn drain_form(mut multipart: Multipart) -> Result<FormAccumulator> {
    let mut form = FormAccumulator::empty();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "file" {
            let original_name = field
                .file_name()
                .map(|n| n.to_string())
                .ok_or_else(|| AppError::BadRequest("File part is missing a filename".to_string()))?;
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read file part: {}", e)))?
                .to_vec();
            if data.is_empty() {
                return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
            }
            form.asset = Some(UploadedAsset {
                data,
                original_name,
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read field '{}': {}", name, e)))?;

        match name.as_str() {
            "title" => form.title = Some(value),
            "description" => form.description = Some(value),
            "category_id" => {
                form.category_id = Some(parse_field(&name, &value)?);
            }
            "price" => form.price = Some(parse_field(&name, &value)?),
            "is_free" => form.is_free = Some(parse_field(&name, &value)?),
            "preview_url" => form.preview_url = Some(value),
            "is_downloadable" => form.is_downloadable = Some(parse_field(&name, &value)?),
            "download_limit_days" => {
                form.download_limit_days = Some(parse_field(&name, &value)?)
            }
            // unknown fields are ignored
            _ => {}
        }
    }

    Ok(form)
}

fn parse_field<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid value for field '{}'", name)))
}

async fn parse_create_form(multipart: Multipart) -> Result<(CreateFileDto, UploadedAsset)> {
    let form = drain_form(multipart).await?;

    let title = form
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Title is required".to_string()))?;
    let price = form
        .price
        .ok_or_else(|| AppError::Validation("Price is required".to_string()))?;
    let asset = form
        .asset
        .ok_or_else(|| AppError::BadRequest("File part is required".to_string()))?;

    Ok((
        CreateFileDto {
            title,
            description: form.description,
            category_id: form.category_id,
            price,
            is_free: form.is_free.unwrap_or(false),
            preview_url: form.preview_url,
            is_downloadable: form.is_downloadable,
            download_limit_days: form.download_limit_days,
        },
        asset,
    ))
}

async fn parse_update_form(
    multipart: Multipart,
) -> Result<(UpdateFileDto, Option<UploadedAsset>)> {
    let form = drain_form(multipart).await?;

    if let Some(title) = &form.title {
        if title.trim().is_empty() {
            return Err(AppError::Validation("Title must not be empty".to_string()));
        }
    }

    Ok((
        UpdateFileDto {
            title: form.title,
            description: form.description,
            category_id: form.category_id,
            price: form.price,
            is_free: form.is_free,
            preview_url: form.preview_url,
            is_downloadable: form.is_downloadable,
            download_limit_days: form.download_limit_days,
        },
        form.asset,
    ))
}
