use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::CurrentUser;
use crate::features::payments::dtos::{
    CreatePaymentDto, CreatePaymentMethodDto, PaymentInvoiceDto, PaymentMethodResponseDto,
    PaymentResponseDto, UpdatePaymentMethodDto, VerifyPaymentDto,
};
use crate::features::payments::models::{PaymentMethod, PaymentRecord, PaymentStatus};
use crate::shared::types::{Pagination, PaginationQuery};

const METHOD_COLUMNS: &str =
    "id, name, type, details, instructions, is_active, created_at, updated_at";

const PAYMENT_COLUMNS: &str = "p.id, p.user_id, p.file_id, p.payment_method_id, p.amount, \
     p.status, p.transaction_id, p.payment_details, p.payment_instructions, p.admin_notes, \
     p.verified_at, p.created_at, p.updated_at, f.title AS file_title, \
     m.name AS method_name, u.name AS user_name, u.email AS user_email";

/// Only pending payments may move to a terminal status.
const VERIFY_PAYMENT_SQL: &str = r#"
    UPDATE payments
    SET status = $1, admin_notes = $2, verified_at = NOW(), updated_at = NOW()
    WHERE id = $3 AND status = 'pending'
"#;

#[derive(sqlx::FromRow)]
struct FilePricing {
    price: Decimal,
    is_free: bool,
}

/// Service for payment methods and the manual payment/verification flow
pub struct PaymentService {
    pool: PgPool,
}

impl PaymentService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    // PAYMENT METHODS
    // =========================================================================

    /// Methods visible to buyers; inactive ones are hidden.
    pub async fn list_active_methods(&self) -> Result<Vec<PaymentMethodResponseDto>> {
        let methods = sqlx::query_as::<_, PaymentMethod>(&format!(
            "SELECT {METHOD_COLUMNS} FROM payment_methods WHERE is_active ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(methods.into_iter().map(Into::into).collect())
    }

    pub async fn list_all_methods(&self) -> Result<Vec<PaymentMethodResponseDto>> {
        let methods = sqlx::query_as::<_, PaymentMethod>(&format!(
            "SELECT {METHOD_COLUMNS} FROM payment_methods ORDER BY name"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(methods.into_iter().map(Into::into).collect())
    }

    pub async fn create_method(
        &self,
        dto: CreatePaymentMethodDto,
    ) -> Result<PaymentMethodResponseDto> {
        let method = sqlx::query_as::<_, PaymentMethod>(&format!(
            r#"
            INSERT INTO payment_methods (name, type, details, instructions, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {METHOD_COLUMNS}
            "#
        ))
        .bind(&dto.name)
        .bind(&dto.method_type)
        .bind(dto.details.unwrap_or_else(|| serde_json::json!({})))
        .bind(&dto.instructions)
        .bind(dto.is_active.unwrap_or(true))
        .fetch_one(&self.pool)
        .await?;

        Ok(method.into())
    }

    pub async fn update_method(
        &self,
        id: Uuid,
        dto: UpdatePaymentMethodDto,
    ) -> Result<PaymentMethodResponseDto> {
        let existing = sqlx::query_as::<_, PaymentMethod>(&format!(
            "SELECT {METHOD_COLUMNS} FROM payment_methods WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Payment method not found".to_string()))?;

        let method = sqlx::query_as::<_, PaymentMethod>(&format!(
            r#"
            UPDATE payment_methods
            SET name = $1, type = $2, details = $3, instructions = $4,
                is_active = $5, updated_at = NOW()
            WHERE id = $6
            RETURNING {METHOD_COLUMNS}
            "#
        ))
        .bind(dto.name.as_deref().unwrap_or(&existing.name))
        .bind(dto.method_type.as_deref().unwrap_or(&existing.method_type))
        .bind(dto.details.unwrap_or(existing.details))
        .bind(dto.instructions.as_ref().or(existing.instructions.as_ref()))
        .bind(dto.is_active.unwrap_or(existing.is_active))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(method.into())
    }

    pub async fn delete_method(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM payment_methods WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Payment method not found".to_string()));
        }
        Ok(())
    }

    // =========================================================================
    // PAYMENTS
    // =========================================================================

    /// Open a pending payment. Method details and instructions are snapshotted
    /// onto the payment row so later method edits do not rewrite history.
    pub async fn create(&self, user_id: Uuid, dto: CreatePaymentDto) -> Result<PaymentResponseDto> {
        let file = sqlx::query_as::<_, FilePricing>(
            "SELECT price, is_free FROM files WHERE id = $1",
        )
        .bind(dto.file_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        if file.is_free {
            return Err(AppError::Validation(
                "Free files do not require payment".to_string(),
            ));
        }

        let already_owned = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM purchases
            WHERE user_id = $1 AND file_id = $2 AND status = 'completed'
            "#,
        )
        .bind(user_id)
        .bind(dto.file_id)
        .fetch_optional(&self.pool)
        .await?;

        if already_owned.is_some() {
            return Err(AppError::Conflict("File already purchased".to_string()));
        }

        let method = sqlx::query_as::<_, PaymentMethod>(&format!(
            "SELECT {METHOD_COLUMNS} FROM payment_methods WHERE id = $1 AND is_active"
        ))
        .bind(dto.payment_method_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::Validation("Invalid payment method".to_string()))?;

        let payment_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO payments (
                user_id, file_id, payment_method_id, amount, status,
                transaction_id, payment_details, payment_instructions
            )
            VALUES ($1, $2, $3, $4, 'pending', $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(dto.file_id)
        .bind(method.id)
        .bind(file.price)
        .bind(&dto.transaction_id)
        .bind(&method.details)
        .bind(&method.instructions)
        .fetch_one(&self.pool)
        .await?;

        info!(%payment_id, %user_id, file_id = %dto.file_id, "Payment opened");
        self.fetch_record(payment_id).await.map(Into::into)
    }

    /// Admin verification. A completed verification atomically settles the
    /// purchase and seeds the download counter.
    pub async fn verify(&self, id: Uuid, dto: VerifyPaymentDto) -> Result<PaymentResponseDto> {
        let target = PaymentStatus::parse(&dto.status)?;
        if !target.is_terminal() {
            return Err(AppError::Validation(
                "Verification status must be completed, failed or refunded".to_string(),
            ));
        }

        let payment = self.fetch_record(id).await?;

        let mut tx = self.pool.begin().await?;

        // The status guard lives in the UPDATE itself so a concurrent verify
        // cannot re-settle a payment that already left pending.
        let updated = sqlx::query(VERIFY_PAYMENT_SQL)
            .bind(target.as_str())
            .bind(&dto.admin_notes)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::Conflict(
                "Payment has already been processed".to_string(),
            ));
        }

        if target == PaymentStatus::Completed {
            sqlx::query(
                r#"
                INSERT INTO purchases (user_id, file_id, payment_id, amount, status)
                VALUES ($1, $2, $3, $4, 'completed')
                ON CONFLICT ON CONSTRAINT purchases_user_id_file_id_key
                DO UPDATE SET status = 'completed', payment_id = $3, updated_at = NOW()
                "#,
            )
            .bind(payment.user_id)
            .bind(payment.file_id)
            .bind(id)
            .bind(payment.amount)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                r#"
                INSERT INTO downloads (user_id, file_id, download_count)
                VALUES ($1, $2, 0)
                ON CONFLICT (user_id, file_id) DO NOTHING
                "#,
            )
            .bind(payment.user_id)
            .bind(payment.file_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(payment_id = %id, status = %target, "Payment verified");
        self.fetch_record(id).await.map(Into::into)
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        query: &PaginationQuery,
    ) -> Result<(Vec<PaymentResponseDto>, Pagination)> {
        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM payments WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await?;

        let payments = sqlx::query_as::<_, PaymentRecord>(&format!(
            r#"
            SELECT {PAYMENT_COLUMNS}
            FROM payments p
            LEFT JOIN files f ON f.id = p.file_id
            LEFT JOIN payment_methods m ON m.id = p.payment_method_id
            LEFT JOIN users u ON u.id = p.user_id
            WHERE p.user_id = $1
            ORDER BY p.created_at DESC
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(user_id)
        .bind(query.limit())
        .bind(query.offset())
        .fetch_all(&self.pool)
        .await?;

        let pagination = Pagination::new(query, total);
        Ok((payments.into_iter().map(Into::into).collect(), pagination))
    }

    pub async fn get(&self, current_user: &CurrentUser, id: Uuid) -> Result<PaymentResponseDto> {
        Ok(self.fetch_owned(current_user, id).await?.into())
    }

    /// Render the invoice view for a payment.
    pub async fn invoice(&self, current_user: &CurrentUser, id: Uuid) -> Result<PaymentInvoiceDto> {
        let payment = self.fetch_owned(current_user, id).await?;

        Ok(PaymentInvoiceDto {
            invoice_number: invoice_number(payment.id, payment.created_at),
            customer_name: payment.user_name,
            customer_email: payment.user_email,
            item_title: payment.file_title,
            amount: payment.amount,
            payment_method: payment.method_name,
            status: payment.status,
            issued_at: payment.created_at,
        })
    }

    async fn fetch_owned(&self, current_user: &CurrentUser, id: Uuid) -> Result<PaymentRecord> {
        let payment = self.fetch_record(id).await?;

        if !current_user.is_admin && payment.user_id != current_user.id {
            return Err(AppError::NotFound("Payment not found".to_string()));
        }

        Ok(payment)
    }

    async fn fetch_record(&self, id: Uuid) -> Result<PaymentRecord> {
        let payment = sqlx::query_as::<_, PaymentRecord>(&format!(
            r#"
            SELECT {PAYMENT_COLUMNS}
            FROM payments p
            LEFT JOIN files f ON f.id = p.file_id
            LEFT JOIN payment_methods m ON m.id = p.payment_method_id
            LEFT JOIN users u ON u.id = p.user_id
            WHERE p.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        payment.ok_or_else(|| AppError::NotFound("Payment not found".to_string()))
    }
}

/// Invoice numbers embed the payment id prefix and the issue timestamp so
/// they stay unique without another sequence.
fn invoice_number(payment_id: Uuid, issued_at: DateTime<Utc>) -> String {
    let prefix = payment_id.simple().to_string();
    format!(
        "INV-{}-{}",
        prefix[..8].to_uppercase(),
        issued_at.timestamp_millis()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn invoice_number_format() {
        let id = Uuid::parse_str("a1b2c3d4-0000-0000-0000-000000000000").unwrap();
        let issued = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();

        let number = invoice_number(id, issued);
        assert!(number.starts_with("INV-A1B2C3D4-"));
        assert!(number.ends_with(&issued.timestamp_millis().to_string()));
    }

    #[test]
    fn invoice_number_is_stable_for_same_inputs() {
        let id = Uuid::new_v4();
        let issued = Utc::now();
        assert_eq!(invoice_number(id, issued), invoice_number(id, issued));
    }

    #[test]
    fn verify_update_only_touches_pending_payments() {
        // A concurrent verify must not re-settle a terminal payment, so the
        // transition is guarded in the statement rather than a prior read.
        assert!(VERIFY_PAYMENT_SQL.contains("AND status = 'pending'"));
        assert!(VERIFY_PAYMENT_SQL.trim_start().starts_with("UPDATE payments"));
    }
}
