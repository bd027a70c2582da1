use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Marketplace-wide counters for the dashboard header
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverviewRow {
    pub total_files: i64,
    pub total_users: i64,
    pub total_purchases: i64,
    pub completed_purchases: i64,
    pub pending_purchases: i64,
    pub total_revenue: Decimal,
}

/// One month of the trailing revenue/purchase series
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPoint {
    /// `YYYY-MM`
    pub month: String,
    pub revenue: Decimal,
    pub purchases: i64,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopFileRow {
    pub id: Uuid,
    pub title: String,
    pub price: Decimal,
    pub purchase_count: i64,
    pub revenue: Decimal,
}

/// Recent purchase shown in the activity feed
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRow {
    pub id: Uuid,
    pub user_name: Option<String>,
    pub file_title: Option<String>,
    pub amount: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileSummaryRow {
    pub id: Uuid,
    pub title: String,
    pub price: Decimal,
    pub is_free: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileStatsRow {
    pub purchase_count: i64,
    pub completed_count: i64,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummaryRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserStatsRow {
    pub purchase_count: i64,
    pub completed_count: i64,
    pub total_spent: Decimal,
}

/// A purchase in a per-file or per-user history listing
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseHistoryRow {
    pub id: Uuid,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub file_title: Option<String>,
    pub amount: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
