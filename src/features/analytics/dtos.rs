use serde::Serialize;
use utoipa::ToSchema;

use crate::features::analytics::models::{
    ActivityRow, FileStatsRow, FileSummaryRow, MonthlyPoint, OverviewRow, PurchaseHistoryRow,
    TopFileRow, UserStatsRow, UserSummaryRow,
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDto {
    pub overview: OverviewRow,
    /// Trailing twelve months, oldest first
    pub monthly: Vec<MonthlyPoint>,
    pub top_files: Vec<TopFileRow>,
    pub recent_activity: Vec<ActivityRow>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileAnalyticsDto {
    pub file: FileSummaryRow,
    pub stats: FileStatsRow,
    pub history: Vec<PurchaseHistoryRow>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserAnalyticsDto {
    pub user: UserSummaryRow,
    pub stats: UserStatsRow,
    pub history: Vec<PurchaseHistoryRow>,
}
