use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A download counter row joined with file context for the history view
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DownloadHistoryRecord {
    pub file_id: Uuid,
    pub download_count: i32,
    pub last_downloaded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub file_title: Option<String>,
    pub preview_url: Option<String>,
    pub price: Option<Decimal>,
    pub is_free: Option<bool>,
}
