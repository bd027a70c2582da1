use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::files::models::FileRecord;

/// Response DTO for a catalog file
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileResponseDto {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub price: Decimal,
    pub is_free: bool,
    pub file_name: String,
    pub file_size: i64,
    pub file_type: Option<String>,
    pub preview_url: Option<String>,
    pub download_url: Option<String>,
    pub is_downloadable: bool,
    pub download_limit_days: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FileRecord> for FileResponseDto {
    fn from(f: FileRecord) -> Self {
        Self {
            id: f.id,
            title: f.title,
            description: f.description,
            category_id: f.category_id,
            category_name: f.category_name,
            price: f.price,
            is_free: f.is_free,
            file_name: f.file_name,
            file_size: f.file_size,
            file_type: f.file_type,
            preview_url: f.preview_url,
            download_url: f.download_url,
            is_downloadable: f.is_downloadable,
            download_limit_days: f.download_limit_days,
            created_at: f.created_at,
            updated_at: f.updated_at,
        }
    }
}

/// Metadata fields of the multipart upload form
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateFileDto {
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub price: Decimal,
    pub is_free: bool,
    pub preview_url: Option<String>,
    pub is_downloadable: Option<bool>,
    pub download_limit_days: Option<i32>,
}

/// Partial update; every field optional, the asset itself may also be replaced
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateFileDto {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub price: Option<Decimal>,
    pub is_free: Option<bool>,
    pub preview_url: Option<String>,
    pub is_downloadable: Option<bool>,
    pub download_limit_days: Option<i32>,
}

/// Query parameters for the file listing
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct FileListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub category: Option<Uuid>,
    pub is_free: Option<bool>,
}

/// Free files must be priced at zero and paid files above zero.
pub fn check_price_policy(price: Decimal, is_free: bool) -> Result<()> {
    if is_free && !price.is_zero() {
        return Err(AppError::Validation(
            "Free files must have a price of 0".to_string(),
        ));
    }
    if !is_free && price <= Decimal::ZERO {
        return Err(AppError::Validation(
            "Paid files must have a price greater than 0".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_file_with_zero_price_passes() {
        assert!(check_price_policy(Decimal::ZERO, true).is_ok());
    }

    #[test]
    fn free_file_with_nonzero_price_rejected() {
        let err = check_price_policy(Decimal::new(999, 2), true).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn paid_file_with_positive_price_passes() {
        assert!(check_price_policy(Decimal::new(450, 2), false).is_ok());
    }

    #[test]
    fn paid_file_with_zero_price_rejected() {
        assert!(check_price_policy(Decimal::ZERO, false).is_err());
    }

    #[test]
    fn paid_file_with_negative_price_rejected() {
        assert!(check_price_policy(Decimal::new(-1, 0), false).is_err());
    }
}
