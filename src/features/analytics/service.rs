use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::analytics::dtos::{DashboardDto, FileAnalyticsDto, UserAnalyticsDto};
use crate::features::analytics::models::{
    ActivityRow, FileStatsRow, FileSummaryRow, MonthlyPoint, OverviewRow, PurchaseHistoryRow,
    TopFileRow, UserStatsRow, UserSummaryRow,
};

/// Read-only aggregates for the admin dashboard
pub struct AnalyticsService {
    pool: PgPool,
}

impl AnalyticsService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn dashboard(&self) -> Result<DashboardDto> {
        let overview = sqlx::query_as::<_, OverviewRow>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM files) AS total_files,
                (SELECT COUNT(*) FROM users) AS total_users,
                (SELECT COUNT(*) FROM purchases) AS total_purchases,
                (SELECT COUNT(*) FROM purchases WHERE status = 'completed') AS completed_purchases,
                (SELECT COUNT(*) FROM purchases WHERE status = 'pending') AS pending_purchases,
                (SELECT COALESCE(SUM(amount), 0) FROM purchases WHERE status = 'completed') AS total_revenue
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let monthly = sqlx::query_as::<_, MonthlyPoint>(
            r#"
            SELECT
                to_char(date_trunc('month', created_at), 'YYYY-MM') AS month,
                COALESCE(SUM(amount) FILTER (WHERE status = 'completed'), 0) AS revenue,
                COUNT(*) AS purchases
            FROM purchases
            WHERE created_at >= date_trunc('month', NOW()) - INTERVAL '11 months'
            GROUP BY 1
            ORDER BY 1
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let top_files = sqlx::query_as::<_, TopFileRow>(
            r#"
            SELECT f.id, f.title, f.price,
                   COUNT(p.id) AS purchase_count,
                   COALESCE(SUM(p.amount), 0) AS revenue
            FROM purchases p
            JOIN files f ON f.id = p.file_id
            WHERE p.status = 'completed'
            GROUP BY f.id, f.title, f.price
            ORDER BY purchase_count DESC, revenue DESC
            LIMIT 10
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let recent_activity = sqlx::query_as::<_, ActivityRow>(
            r#"
            SELECT p.id, u.name AS user_name, f.title AS file_title,
                   p.amount, p.status, p.created_at
            FROM purchases p
            LEFT JOIN users u ON u.id = p.user_id
            LEFT JOIN files f ON f.id = p.file_id
            ORDER BY p.created_at DESC
            LIMIT 20
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(DashboardDto {
            overview,
            monthly,
            top_files,
            recent_activity,
        })
    }

    pub async fn file_analytics(&self, file_id: Uuid) -> Result<FileAnalyticsDto> {
        let file = sqlx::query_as::<_, FileSummaryRow>(
            "SELECT id, title, price, is_free, created_at FROM files WHERE id = $1",
        )
        .bind(file_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        let stats = sqlx::query_as::<_, FileStatsRow>(
            r#"
            SELECT
                COUNT(*) AS purchase_count,
                COUNT(*) FILTER (WHERE status = 'completed') AS completed_count,
                COALESCE(SUM(amount) FILTER (WHERE status = 'completed'), 0) AS revenue
            FROM purchases
            WHERE file_id = $1
            "#,
        )
        .bind(file_id)
        .fetch_one(&self.pool)
        .await?;

        let history = sqlx::query_as::<_, PurchaseHistoryRow>(
            r#"
            SELECT p.id, u.name AS user_name, u.email AS user_email,
                   f.title AS file_title, p.amount, p.status, p.created_at
            FROM purchases p
            LEFT JOIN users u ON u.id = p.user_id
            LEFT JOIN files f ON f.id = p.file_id
            WHERE p.file_id = $1
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(file_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(FileAnalyticsDto {
            file,
            stats,
            history,
        })
    }

    pub async fn user_analytics(&self, user_id: Uuid) -> Result<UserAnalyticsDto> {
        let user = sqlx::query_as::<_, UserSummaryRow>(
            "SELECT id, name, email, created_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let stats = sqlx::query_as::<_, UserStatsRow>(
            r#"
            SELECT
                COUNT(*) AS purchase_count,
                COUNT(*) FILTER (WHERE status = 'completed') AS completed_count,
                COALESCE(SUM(amount) FILTER (WHERE status = 'completed'), 0) AS total_spent
            FROM purchases
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let history = sqlx::query_as::<_, PurchaseHistoryRow>(
            r#"
            SELECT p.id, u.name AS user_name, u.email AS user_email,
                   f.title AS file_title, p.amount, p.status, p.created_at
            FROM purchases p
            LEFT JOIN users u ON u.id = p.user_id
            LEFT JOIN files f ON f.id = p.file_id
            WHERE p.user_id = $1
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(UserAnalyticsDto {
            user,
            stats,
            history,
        })
    }
}
