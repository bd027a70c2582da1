use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::{
    CategoryResponseDto, CreateCategoryDto, UpdateCategoryDto,
};
use crate::features::categories::models::Category;

const CATEGORY_COLUMNS: &str = "id, name, slug, description, created_at, updated_at";

/// Service for category operations
pub struct CategoryService {
    pool: PgPool,
}

impl CategoryService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<CategoryResponseDto>> {
        let categories = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(categories.into_iter().map(|c| c.into()).collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<CategoryResponseDto> {
        let category = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        category
            .map(|c| c.into())
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))
    }

    pub async fn create(&self, dto: CreateCategoryDto) -> Result<CategoryResponseDto> {
        self.ensure_unique(&dto.name, &dto.slug, None).await?;

        let category = sqlx::query_as::<_, Category>(&format!(
            r#"
            INSERT INTO categories (name, slug, description)
            VALUES ($1, $2, $3)
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(&dto.name)
        .bind(&dto.slug)
        .bind(&dto.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "Category name or slug already exists"))?;

        Ok(category.into())
    }

    /// Partial update; only supplied fields change.
    pub async fn update(&self, id: Uuid, dto: UpdateCategoryDto) -> Result<CategoryResponseDto> {
        let existing = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;

        let name = dto.name.unwrap_or(existing.name);
        let slug = dto.slug.unwrap_or(existing.slug);
        let description = dto.description.or(existing.description);

        self.ensure_unique(&name, &slug, Some(id)).await?;

        let category = sqlx::query_as::<_, Category>(&format!(
            r#"
            UPDATE categories
            SET name = $1, slug = $2, description = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING {CATEGORY_COLUMNS}
            "#
        ))
        .bind(&name)
        .bind(&slug)
        .bind(&description)
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "Category name or slug already exists"))?;

        Ok(category.into())
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Category not found".to_string()));
        }

        Ok(())
    }

    /// Reject duplicate name or slug among other rows before the write; the
    /// unique constraints remain the backstop under concurrency.
    async fn ensure_unique(&self, name: &str, slug: &str, exclude: Option<Uuid>) -> Result<()> {
        let duplicate = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM categories
            WHERE (name = $1 OR slug = $2) AND ($3::uuid IS NULL OR id <> $3)
            "#,
        )
        .bind(name)
        .bind(slug)
        .bind(exclude)
        .fetch_optional(&self.pool)
        .await?;

        if duplicate.is_some() {
            return Err(AppError::Validation(
                "Category name or slug already exists".to_string(),
            ));
        }

        Ok(())
    }
}
