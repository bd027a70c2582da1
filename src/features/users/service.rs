use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::service::{hash_password, verify_password};
use crate::features::users::dtos::{
    ChangePasswordDto, UpdateProfileDto, UserListItemDto, UserProfileDto,
};
use crate::shared::types::{Pagination, PaginationQuery};

const PROFILE_COLUMNS: &str =
    "id, name, email, is_admin, bio, avatar_url, is_verified, created_at";

/// Profile self-service and admin user management
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<UserProfileDto> {
        let profile = sqlx::query_as::<_, UserProfileDto>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        profile.ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        dto: UpdateProfileDto,
    ) -> Result<UserProfileDto> {
        let profile = sqlx::query_as::<_, UserProfileDto>(&format!(
            r#"
            UPDATE users
            SET name = COALESCE($1, name),
                bio = COALESCE($2, bio),
                avatar_url = COALESCE($3, avatar_url),
                updated_at = NOW()
            WHERE id = $4
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(&dto.name)
        .bind(&dto.bio)
        .bind(&dto.avatar_url)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        profile.ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Re-hash only after the current password has been verified.
    pub async fn change_password(&self, user_id: Uuid, dto: ChangePasswordDto) -> Result<()> {
        let stored_hash =
            sqlx::query_scalar::<_, String>("SELECT password_hash FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if !verify_password(&dto.current_password, &stored_hash)? {
            return Err(AppError::Unauthorized(
                "Current password is incorrect".to_string(),
            ));
        }

        let new_hash = hash_password(&dto.new_password)?;
        sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
            .bind(&new_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        info!(%user_id, "Password changed");
        Ok(())
    }

    pub async fn list(
        &self,
        query: &PaginationQuery,
    ) -> Result<(Vec<UserListItemDto>, Pagination)> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        let users = sqlx::query_as::<_, UserListItemDto>(
            r#"
            SELECT id, name, email, is_admin, is_verified, created_at
            FROM users
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(query.limit())
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        let pagination = Pagination::new(query, total);
        Ok((users, pagination))
    }

    /// Admin delete; purchases, payments and downloads cascade away with the
    /// row.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        info!(user_id = %id, "User deleted");
        Ok(())
    }
}
