use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// A purchase row projected into invoice context
#[derive(Debug, Clone, FromRow)]
pub struct InvoiceRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_id: Uuid,
    pub amount: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub file_title: Option<String>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
}

/// The subset of `site_settings` an invoice renders with
#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub site_name: String,
    pub currency: String,
    pub tax_rate: Decimal,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_name: "File Market".to_string(),
            currency: "USD".to_string(),
            tax_rate: Decimal::ZERO,
        }
    }
}
