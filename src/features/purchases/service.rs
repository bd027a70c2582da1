use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::CurrentUser;
use crate::features::purchases::dtos::{PurchaseListQuery, PurchaseResponseDto};
use crate::features::purchases::models::{PurchaseRecord, PurchaseStatus};
use crate::shared::constants::DEFAULT_PAGE_SIZE;
use crate::shared::types::{Pagination, PaginationQuery};

const PURCHASE_COLUMNS: &str = "p.id, p.user_id, p.file_id, p.payment_id, p.amount, p.status, \
     p.created_at, p.updated_at, f.title AS file_title, f.preview_url, \
     u.name AS user_name, u.email AS user_email";

/// Completed purchases never match, keeping the protection atomic.
const DELETE_PURCHASE_SQL: &str =
    "DELETE FROM purchases WHERE id = $1 AND status <> 'completed'";

#[derive(sqlx::FromRow)]
struct FilePricing {
    price: Decimal,
    is_free: bool,
}

/// Service for purchase lifecycle operations
pub struct PurchaseService {
    pool: PgPool,
}

impl PurchaseService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a pending purchase for a paid file. The zero-count download row
    /// is seeded in the same transaction so the delivery path never has to
    /// special-case a missing counter.
    pub async fn create(&self, user_id: Uuid, file_id: Uuid) -> Result<PurchaseResponseDto> {
        let file = sqlx::query_as::<_, FilePricing>(
            "SELECT price, is_free FROM files WHERE id = $1",
        )
        .bind(file_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        if file.is_free {
            return Err(AppError::Validation(
                "Free files do not require a purchase".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let purchase_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO purchases (user_id, file_id, amount, status)
            VALUES ($1, $2, $3, 'pending')
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(file_id)
        .bind(file.price)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::conflict_on_unique(e, "File already purchased"))?;

        sqlx::query(
            r#"
            INSERT INTO downloads (user_id, file_id, download_count)
            VALUES ($1, $2, 0)
            ON CONFLICT (user_id, file_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(file_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(%purchase_id, %user_id, %file_id, "Purchase created");
        self.fetch_record(purchase_id).await.map(Into::into)
    }

    pub async fn list(
        &self,
        current_user: &CurrentUser,
        query: PurchaseListQuery,
    ) -> Result<(Vec<PurchaseResponseDto>, Pagination)> {
        let pagination_query = PaginationQuery {
            page: query.page.unwrap_or(1),
            limit: query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        };

        // Regular users only ever see their own rows.
        let scope_user = if current_user.is_admin {
            query.user_id
        } else {
            Some(current_user.id)
        };

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM purchases p WHERE ($1::uuid IS NULL OR p.user_id = $1)",
        )
        .bind(scope_user)
        .fetch_one(&self.pool)
        .await?;

        let purchases = sqlx::query_as::<_, PurchaseRecord>(&format!(
            r#"
            SELECT {PURCHASE_COLUMNS}
            FROM purchases p
            LEFT JOIN files f ON f.id = p.file_id
            LEFT JOIN users u ON u.id = p.user_id
            WHERE ($1::uuid IS NULL OR p.user_id = $1)
            ORDER BY p.created_at DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(scope_user)
        .bind(pagination_query.limit())
        .bind(pagination_query.offset())
        .fetch_all(&self.pool)
        .await?;

        let pagination = Pagination::new(&pagination_query, total);
        Ok((
            purchases.into_iter().map(Into::into).collect(),
            pagination,
        ))
    }

    pub async fn get(&self, current_user: &CurrentUser, id: Uuid) -> Result<PurchaseResponseDto> {
        let purchase = self.fetch_record(id).await?;

        // NotFound rather than Forbidden so foreign ids do not leak existence.
        if !current_user.is_admin && purchase.user_id != current_user.id {
            return Err(AppError::NotFound("Purchase not found".to_string()));
        }

        Ok(purchase.into())
    }

    /// Admin status transition. Completing a purchase also settles the linked
    /// payment in the same transaction.
    pub async fn update_status(&self, id: Uuid, status: &str) -> Result<PurchaseResponseDto> {
        let status = PurchaseStatus::parse(status)?;

        let mut tx = self.pool.begin().await?;

        let payment_id = sqlx::query_scalar::<_, Option<Uuid>>(
            r#"
            UPDATE purchases
            SET status = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING payment_id
            "#,
        )
        .bind(status.as_str())
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase not found".to_string()))?;

        if status == PurchaseStatus::Completed {
            if let Some(payment_id) = payment_id {
                sqlx::query(
                    r#"
                    UPDATE payments
                    SET status = 'completed', verified_at = NOW(), updated_at = NOW()
                    WHERE id = $1
                    "#,
                )
                .bind(payment_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        info!(purchase_id = %id, status = %status, "Purchase status updated");
        self.fetch_record(id).await.map(Into::into)
    }

    /// Admin delete. Completed purchases represent settled money and are
    /// protected from deletion; the guard lives in the DELETE itself so a
    /// racing status update cannot slip a completed row past it.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query(DELETE_PURCHASE_SQL)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            let exists =
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM purchases WHERE id = $1")
                    .bind(id)
                    .fetch_one(&self.pool)
                    .await?;

            return if exists > 0 {
                Err(AppError::Conflict(
                    "Completed purchases cannot be deleted".to_string(),
                ))
            } else {
                Err(AppError::NotFound("Purchase not found".to_string()))
            };
        }

        Ok(())
    }

    async fn fetch_record(&self, id: Uuid) -> Result<PurchaseRecord> {
        let purchase = sqlx::query_as::<_, PurchaseRecord>(&format!(
            r#"
            SELECT {PURCHASE_COLUMNS}
            FROM purchases p
            LEFT JOIN files f ON f.id = p.file_id
            LEFT JOIN users u ON u.id = p.user_id
            WHERE p.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        purchase.ok_or_else(|| AppError::NotFound("Purchase not found".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_statement_skips_completed_purchases() {
        assert!(DELETE_PURCHASE_SQL.contains("status <> 'completed'"));
        assert!(DELETE_PURCHASE_SQL.starts_with("DELETE FROM purchases"));
    }
}
