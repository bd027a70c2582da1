use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::error::AppError;

/// Purchase lifecycle status, stored as TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PurchaseStatus {
    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "refunded" => Ok(Self::Refunded),
            other => Err(AppError::Validation(format!(
                "Unknown purchase status: {}",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
        }
    }
}

impl std::fmt::Display for PurchaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A purchase row joined with file and buyer context
#[derive(Debug, Clone, FromRow)]
pub struct PurchaseRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_id: Uuid,
    pub payment_id: Option<Uuid>,
    pub amount: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub file_title: Option<String>,
    pub preview_url: Option<String>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_text() {
        for status in [
            PurchaseStatus::Pending,
            PurchaseStatus::Completed,
            PurchaseStatus::Failed,
            PurchaseStatus::Refunded,
        ] {
            assert_eq!(PurchaseStatus::parse(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = PurchaseStatus::parse("cancelled").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn status_is_case_sensitive() {
        assert!(PurchaseStatus::parse("Pending").is_err());
    }
}
