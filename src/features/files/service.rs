use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::files::dtos::{
    check_price_policy, CreateFileDto, FileListQuery, FileResponseDto, UpdateFileDto,
};
use crate::features::files::models::FileRecord;
use crate::modules::storage::DiskStorage;
use crate::shared::constants::DEFAULT_PAGE_SIZE;
use crate::shared::types::{Pagination, PaginationQuery};

const FILE_COLUMNS: &str = "f.id, f.title, f.description, f.category_id, c.name AS category_name, \
     f.price, f.is_free, f.file_name, f.file_path, f.file_size, f.file_type, f.preview_url, \
     f.download_url, f.is_downloadable, f.download_limit_days, f.created_at, f.updated_at";

/// An uploaded asset handed to the service together with its form metadata
pub struct UploadedAsset {
    pub data: Vec<u8>,
    pub original_name: String,
}

/// Service for the file catalog; owns both the rows and their disk assets
pub struct FileService {
    pool: PgPool,
    storage: Arc<DiskStorage>,
}

impl FileService {
    pub fn new(pool: PgPool, storage: Arc<DiskStorage>) -> Self {
        Self { pool, storage }
    }

    pub async fn list(&self, query: FileListQuery) -> Result<(Vec<FileResponseDto>, Pagination)> {
        let pagination_query = PaginationQuery {
            page: query.page.unwrap_or(1),
            limit: query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        };

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM files f
            WHERE ($1::uuid IS NULL OR f.category_id = $1)
              AND ($2::boolean IS NULL OR f.is_free = $2)
            "#,
        )
        .bind(query.category)
        .bind(query.is_free)
        .fetch_one(&self.pool)
        .await?;

        let files = sqlx::query_as::<_, FileRecord>(&format!(
            r#"
            SELECT {FILE_COLUMNS}
            FROM files f
            LEFT JOIN categories c ON c.id = f.category_id
            WHERE ($1::uuid IS NULL OR f.category_id = $1)
              AND ($2::boolean IS NULL OR f.is_free = $2)
            ORDER BY f.created_at DESC
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(query.category)
        .bind(query.is_free)
        .bind(pagination_query.limit())
        .bind(pagination_query.offset())
        .fetch_all(&self.pool)
        .await?;

        let pagination = Pagination::new(&pagination_query, total);
        Ok((files.into_iter().map(|f| f.into()).collect(), pagination))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<FileResponseDto> {
        Ok(self.get_record(id).await?.into())
    }

    /// Fetch the full row, including storage metadata not exposed in the DTO.
    pub async fn get_record(&self, id: Uuid) -> Result<FileRecord> {
        let file = sqlx::query_as::<_, FileRecord>(&format!(
            r#"
            SELECT {FILE_COLUMNS}
            FROM files f
            LEFT JOIN categories c ON c.id = f.category_id
            WHERE f.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        file.ok_or_else(|| AppError::NotFound("File not found".to_string()))
    }

    pub async fn create(&self, dto: CreateFileDto, asset: UploadedAsset) -> Result<FileResponseDto> {
        check_price_policy(dto.price, dto.is_free)?;
        if let Some(category_id) = dto.category_id {
            self.ensure_category_exists(category_id).await?;
        }

        let file_type = guess_mime(&asset.original_name);
        let original_name = asset.original_name.clone();
        let stored = self.storage.store(asset.data, &asset.original_name).await?;

        let inserted = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO files (
                title, description, category_id, price, is_free,
                file_name, file_path, file_size, file_type,
                preview_url, download_url, is_downloadable, download_limit_days
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id
            "#,
        )
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(dto.category_id)
        .bind(dto.price)
        .bind(dto.is_free)
        .bind(&original_name)
        .bind(&stored.stored_name)
        .bind(stored.file_size)
        .bind(&file_type)
        .bind(&dto.preview_url)
        .bind(&stored.download_url)
        .bind(dto.is_downloadable.unwrap_or(true))
        .bind(dto.download_limit_days)
        .fetch_one(&self.pool)
        .await;

        // A failed insert must not leave an orphaned asset on disk.
        let id = match inserted {
            Ok(id) => id,
            Err(e) => {
                self.storage.delete_best_effort(&stored.stored_name).await;
                return Err(e.into());
            }
        };

        self.get_by_id(id).await
    }

    pub async fn update(
        &self,
        id: Uuid,
        dto: UpdateFileDto,
        replacement: Option<UploadedAsset>,
    ) -> Result<FileResponseDto> {
        let existing = self.get_record(id).await?;

        let price = dto.price.unwrap_or(existing.price);
        let is_free = dto.is_free.unwrap_or(existing.is_free);
        check_price_policy(price, is_free)?;

        let category_id = match dto.category_id {
            Some(category_id) => {
                self.ensure_category_exists(category_id).await?;
                Some(category_id)
            }
            None => existing.category_id,
        };

        let (file_name, file_path, file_size, file_type, download_url, new_stored) =
            match replacement {
                Some(asset) => {
                    let file_type = guess_mime(&asset.original_name);
                    let original_name = asset.original_name.clone();
                    let stored = self.storage.store(asset.data, &asset.original_name).await?;
                    (
                        original_name,
                        stored.stored_name.clone(),
                        stored.file_size,
                        file_type,
                        Some(stored.download_url.clone()),
                        Some(stored.stored_name),
                    )
                }
                None => (
                    existing.file_name.clone(),
                    existing.file_path.clone(),
                    existing.file_size,
                    existing.file_type.clone(),
                    existing.download_url.clone(),
                    None,
                ),
            };

        let updated = sqlx::query(
            r#"
            UPDATE files
            SET title = $1, description = $2, category_id = $3, price = $4, is_free = $5,
                file_name = $6, file_path = $7, file_size = $8, file_type = $9,
                preview_url = $10, download_url = $11, is_downloadable = $12,
                download_limit_days = $13, updated_at = NOW()
            WHERE id = $14
            "#,
        )
        .bind(dto.title.as_deref().unwrap_or(&existing.title))
        .bind(dto.description.as_ref().or(existing.description.as_ref()))
        .bind(category_id)
        .bind(price)
        .bind(is_free)
        .bind(&file_name)
        .bind(&file_path)
        .bind(file_size)
        .bind(&file_type)
        .bind(dto.preview_url.as_ref().or(existing.preview_url.as_ref()))
        .bind(&download_url)
        .bind(dto.is_downloadable.unwrap_or(existing.is_downloadable))
        .bind(dto.download_limit_days.or(existing.download_limit_days))
        .bind(id)
        .execute(&self.pool)
        .await;

        match (updated, new_stored) {
            (Ok(_), Some(_)) => {
                // Row now points at the replacement; drop the old asset.
                self.storage.delete_best_effort(&existing.file_path).await;
            }
            (Ok(_), None) => {}
            (Err(e), Some(stored_name)) => {
                self.storage.delete_best_effort(&stored_name).await;
                return Err(e.into());
            }
            (Err(e), None) => return Err(e.into()),
        }

        self.get_by_id(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let existing = self.get_record(id).await?;

        sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        self.storage.delete_best_effort(&existing.file_path).await;
        Ok(())
    }

    async fn ensure_category_exists(&self, category_id: Uuid) -> Result<()> {
        let exists = sqlx::query_scalar::<_, Uuid>("SELECT id FROM categories WHERE id = $1")
            .bind(category_id)
            .fetch_optional(&self.pool)
            .await?;

        if exists.is_none() {
            return Err(AppError::Validation("Category not found".to_string()));
        }
        Ok(())
    }
}

fn guess_mime(original_name: &str) -> Option<String> {
    mime_guess::from_path(original_name)
        .first()
        .map(|m| m.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_guessed_from_extension() {
        assert_eq!(guess_mime("report.pdf").as_deref(), Some("application/pdf"));
        assert_eq!(guess_mime("icons.zip").as_deref(), Some("application/zip"));
        assert_eq!(guess_mime("no-extension"), None);
    }
}
