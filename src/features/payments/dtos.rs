use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::payments::models::{PaymentMethod, PaymentRecord};

// =============================================================================
// PAYMENT METHODS
// =============================================================================

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentMethodResponseDto {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub method_type: String,
    pub details: serde_json::Value,
    pub instructions: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<PaymentMethod> for PaymentMethodResponseDto {
    fn from(m: PaymentMethod) -> Self {
        Self {
            id: m.id,
            name: m.name,
            method_type: m.method_type,
            details: m.details,
            instructions: m.instructions,
            is_active: m.is_active,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePaymentMethodDto {
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    pub name: String,
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 60, message = "Type is required"))]
    pub method_type: String,
    pub details: Option<serde_json::Value>,
    pub instructions: Option<String>,
    pub is_active: Option<bool>,
}

/// Partial update: only supplied fields change
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePaymentMethodDto {
    #[validate(length(min = 1, max = 120, message = "Name must not be empty"))]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub method_type: Option<String>,
    pub details: Option<serde_json::Value>,
    pub instructions: Option<String>,
    pub is_active: Option<bool>,
}

// =============================================================================
// PAYMENTS
// =============================================================================

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePaymentDto {
    pub file_id: Uuid,
    pub payment_method_id: Uuid,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyPaymentDto {
    /// Must be a terminal status (`completed`, `failed` or `refunded`)
    pub status: String,
    pub admin_notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponseDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_id: Uuid,
    pub payment_method_id: Uuid,
    pub amount: Decimal,
    pub status: String,
    pub transaction_id: Option<String>,
    pub payment_instructions: Option<String>,
    pub admin_notes: Option<String>,
    pub file_title: Option<String>,
    pub method_name: Option<String>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<PaymentRecord> for PaymentResponseDto {
    fn from(p: PaymentRecord) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            file_id: p.file_id,
            payment_method_id: p.payment_method_id,
            amount: p.amount,
            status: p.status,
            transaction_id: p.transaction_id,
            payment_instructions: p.payment_instructions,
            admin_notes: p.admin_notes,
            file_title: p.file_title,
            method_name: p.method_name,
            verified_at: p.verified_at,
            created_at: p.created_at,
        }
    }
}

/// Rendered invoice view for a single payment
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInvoiceDto {
    pub invoice_number: String,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub item_title: Option<String>,
    pub amount: Decimal,
    pub payment_method: Option<String>,
    pub status: String,
    pub issued_at: DateTime<Utc>,
}
