use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A catalog file joined with its category name
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct FileRecord {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub price: Decimal,
    pub is_free: bool,
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub file_type: Option<String>,
    pub preview_url: Option<String>,
    pub download_url: Option<String>,
    pub is_downloadable: bool,
    pub download_limit_days: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
