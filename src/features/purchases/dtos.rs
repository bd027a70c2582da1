use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::purchases::models::PurchaseRecord;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePurchaseDto {
    pub file_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePurchaseStatusDto {
    pub status: String,
}

/// Query parameters for the purchase listing
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PurchaseListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Admin only; ignored for regular users
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponseDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_id: Uuid,
    pub payment_id: Option<Uuid>,
    pub amount: Decimal,
    pub status: String,
    pub file_title: Option<String>,
    pub preview_url: Option<String>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PurchaseRecord> for PurchaseResponseDto {
    fn from(p: PurchaseRecord) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            file_id: p.file_id,
            payment_id: p.payment_id,
            amount: p.amount,
            status: p.status,
            file_title: p.file_title,
            preview_url: p.preview_url,
            user_name: p.user_name,
            user_email: p.user_email,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}
