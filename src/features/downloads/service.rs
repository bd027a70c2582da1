use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::downloads::entitlement::within_download_window;
use crate::features::downloads::models::DownloadHistoryRecord;
use crate::features::files::models::FileRecord;
use crate::modules::storage::DiskStorage;
use crate::shared::types::{Pagination, PaginationQuery};

const FILE_COLUMNS: &str = "f.id, f.title, f.description, f.category_id, c.name AS category_name, \
     f.price, f.is_free, f.file_name, f.file_path, f.file_size, f.file_type, f.preview_url, \
     f.download_url, f.is_downloadable, f.download_limit_days, f.created_at, f.updated_at";

/// A file cleared for delivery together with its opened asset
pub struct Delivery {
    pub file: FileRecord,
    pub asset: tokio::fs::File,
}

/// Service for entitlement checks, delivery and download history
pub struct DownloadService {
    pool: PgPool,
    storage: Arc<DiskStorage>,
}

impl DownloadService {
    pub fn new(pool: PgPool, storage: Arc<DiskStorage>) -> Self {
        Self { pool, storage }
    }

    /// Check entitlement, bump the counter and open the asset for streaming.
    pub async fn deliver(&self, user_id: Uuid, file_id: Uuid) -> Result<Delivery> {
        let file = sqlx::query_as::<_, FileRecord>(&format!(
            r#"
            SELECT {FILE_COLUMNS}
            FROM files f
            LEFT JOIN categories c ON c.id = f.category_id
            WHERE f.id = $1
            "#
        ))
        .bind(file_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        self.check_entitlement(user_id, &file).await?;

        let asset = self
            .storage
            .open(&file.file_path)
            .await?
            .ok_or_else(|| AppError::NotFound("File asset is missing".to_string()))?;

        // Single atomic statement; concurrent downloads never lose a count.
        sqlx::query(
            r#"
            INSERT INTO downloads (user_id, file_id, download_count, last_downloaded_at)
            VALUES ($1, $2, 1, NOW())
            ON CONFLICT (user_id, file_id)
            DO UPDATE SET download_count = downloads.download_count + 1,
                          last_downloaded_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(file_id)
        .execute(&self.pool)
        .await?;

        info!(%user_id, %file_id, "File delivered");
        Ok(Delivery { file, asset })
    }

    /// Free files only need authentication; paid files need a completed
    /// purchase that is still inside its download window.
    async fn check_entitlement(&self, user_id: Uuid, file: &FileRecord) -> Result<()> {
        if !file.is_downloadable {
            return Err(AppError::Forbidden(
                "This file is not available for download".to_string(),
            ));
        }

        if file.is_free {
            return Ok(());
        }

        let purchased_at = sqlx::query_scalar::<_, DateTime<Utc>>(
            r#"
            SELECT created_at FROM purchases
            WHERE user_id = $1 AND file_id = $2 AND status = 'completed'
            "#,
        )
        .bind(user_id)
        .bind(file.id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::Forbidden("File has not been purchased".to_string()))?;

        if !within_download_window(purchased_at, file.download_limit_days, Utc::now()) {
            return Err(AppError::Forbidden(
                "Download period has expired".to_string(),
            ));
        }

        Ok(())
    }

    pub async fn history(
        &self,
        user_id: Uuid,
        query: &PaginationQuery,
    ) -> Result<(Vec<DownloadHistoryRecord>, Pagination)> {
        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM downloads WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        let downloads = sqlx::query_as::<_, DownloadHistoryRecord>(
            r#"
            SELECT d.file_id, d.download_count, d.last_downloaded_at, d.created_at,
                   f.title AS file_title, f.preview_url, f.price, f.is_free
            FROM downloads d
            LEFT JOIN files f ON f.id = d.file_id
            WHERE d.user_id = $1
            ORDER BY d.last_downloaded_at DESC NULLS LAST, d.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(query.limit())
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        let pagination = Pagination::new(query, total);
        Ok((downloads, pagination))
    }
}
