use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::invoices::models::InvoiceRecord;

/// Query parameters for the admin invoice listing
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct InvoiceListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDto {
    pub purchase_id: Uuid,
    pub invoice_number: String,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub item_title: Option<String>,
    pub amount: Decimal,
    pub status: String,
    pub issued_at: DateTime<Utc>,
}

/// Full invoice projection including site settings and tax breakdown
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedInvoiceDto {
    pub purchase_id: Uuid,
    pub invoice_number: String,
    pub site_name: String,
    pub currency: String,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub item_title: Option<String>,
    pub subtotal: Decimal,
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    pub total: Decimal,
    pub status: String,
    pub issued_at: DateTime<Utc>,
}

impl InvoiceDto {
    pub fn from_record(record: InvoiceRecord, invoice_number: String) -> Self {
        Self {
            purchase_id: record.id,
            invoice_number,
            customer_name: record.user_name,
            customer_email: record.user_email,
            item_title: record.file_title,
            amount: record.amount,
            status: record.status,
            issued_at: record.created_at,
        }
    }
}
