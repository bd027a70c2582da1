use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue},
    response::Response,
    Json,
};
use serde::Serialize;
use tokio_util::io::ReaderStream;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::auth::model::CurrentUser;
use crate::features::downloads::models::DownloadHistoryRecord;
use crate::features::downloads::service::DownloadService;
use crate::shared::types::{ApiResponse, Pagination, PaginationQuery};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DownloadHistoryResponseDto {
    pub downloads: Vec<DownloadHistoryRecord>,
    pub pagination: Pagination,
}

/// Download a file's asset
#[utoipa::path(
    get,
    path = "/files/{id}/download",
    tag = "downloads",
    params(("id" = Uuid, Path, description = "File id")),
    responses(
        (status = 200, description = "Binary file stream", content_type = "application/octet-stream"),
        (status = 403, description = "Not entitled or download window expired"),
        (status = 404, description = "File or backing asset not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn download_file(
    current_user: CurrentUser,
    State(service): State<Arc<DownloadService>>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    let delivery = service.deliver(current_user.id, id).await?;

    let mut headers = HeaderMap::new();
    let content_type = delivery
        .file
        .file_type
        .as_deref()
        .unwrap_or("application/octet-stream");
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(content_type)
            .unwrap_or(HeaderValue::from_static("application/octet-stream")),
    );

    // The original upload name survives only here.
    let disposition = format!(
        "attachment; filename=\"{}\"",
        delivery.file.file_name.replace('"', "")
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .unwrap_or(HeaderValue::from_static("attachment")),
    );
    headers.insert(header::CONTENT_LENGTH, delivery.file.file_size.into());

    let stream = ReaderStream::new(delivery.asset);
    let mut response = Response::new(Body::from_stream(stream));
    *response.headers_mut() = headers;
    Ok(response)
}

/// Alias route keeping the `/download/{file_id}` shape
#[utoipa::path(
    get,
    path = "/download/{file_id}",
    tag = "downloads",
    params(("file_id" = Uuid, Path, description = "File id")),
    responses(
        (status = 200, description = "Binary file stream", content_type = "application/octet-stream"),
        (status = 403, description = "Not entitled or download window expired"),
        (status = 404, description = "File or backing asset not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn download_file_alias(
    current_user: CurrentUser,
    service: State<Arc<DownloadService>>,
    Path(file_id): Path<Uuid>,
) -> Result<Response> {
    download_file(current_user, service, Path(file_id)).await
}

/// Own download history, most recent first
#[utoipa::path(
    get,
    path = "/download/history/me",
    tag = "downloads",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Paged download history", body = ApiResponse<DownloadHistoryResponseDto>)
    ),
    security(("bearer_auth" = []))
)]
pub async fn download_history(
    current_user: CurrentUser,
    State(service): State<Arc<DownloadService>>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<ApiResponse<DownloadHistoryResponseDto>>> {
    let (downloads, pagination) = service.history(current_user.id, &query).await?;
    Ok(Json(ApiResponse::success(DownloadHistoryResponseDto {
        downloads,
        pagination,
    })))
}
