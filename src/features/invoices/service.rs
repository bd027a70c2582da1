use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::CurrentUser;
use crate::features::invoices::dtos::{GeneratedInvoiceDto, InvoiceDto, InvoiceListQuery};
use crate::features::invoices::models::{InvoiceRecord, SiteSettings};
use crate::shared::constants::DEFAULT_PAGE_SIZE;
use crate::shared::types::{Pagination, PaginationQuery};

const INVOICE_COLUMNS: &str = "p.id, p.user_id, p.file_id, p.amount, p.status, p.created_at, \
     f.title AS file_title, u.name AS user_name, u.email AS user_email";

/// Invoices are a projection over purchases; nothing is persisted separately.
pub struct InvoiceService {
    pool: PgPool,
}

impl InvoiceService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, query: InvoiceListQuery) -> Result<(Vec<InvoiceDto>, Pagination)> {
        let pagination_query = PaginationQuery {
            page: query.page.unwrap_or(1),
            limit: query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        };

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM purchases p
            WHERE ($1::text IS NULL OR p.status = $1)
              AND ($2::date IS NULL OR p.created_at >= $2::date)
              AND ($3::date IS NULL OR p.created_at < $3::date + 1)
            "#,
        )
        .bind(&query.status)
        .bind(query.start_date)
        .bind(query.end_date)
        .fetch_one(&self.pool)
        .await?;

        let records = sqlx::query_as::<_, InvoiceRecord>(&format!(
            r#"
            SELECT {INVOICE_COLUMNS}
            FROM purchases p
            LEFT JOIN files f ON f.id = p.file_id
            LEFT JOIN users u ON u.id = p.user_id
            WHERE ($1::text IS NULL OR p.status = $1)
              AND ($2::date IS NULL OR p.created_at >= $2::date)
              AND ($3::date IS NULL OR p.created_at < $3::date + 1)
            ORDER BY p.created_at DESC
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(&query.status)
        .bind(query.start_date)
        .bind(query.end_date)
        .bind(pagination_query.limit())
        .bind(pagination_query.offset())
        .fetch_all(&self.pool)
        .await?;

        let pagination = Pagination::new(&pagination_query, total);
        let invoices = records
            .into_iter()
            .map(|r| {
                let number = invoice_number(r.id, r.created_at);
                InvoiceDto::from_record(r, number)
            })
            .collect();

        Ok((invoices, pagination))
    }

    pub async fn get(&self, current_user: &CurrentUser, purchase_id: Uuid) -> Result<InvoiceDto> {
        let record = self.fetch_record(purchase_id).await?;

        // NotFound rather than Forbidden so foreign ids do not leak existence.
        if !current_user.is_admin && record.user_id != current_user.id {
            return Err(AppError::NotFound("Invoice not found".to_string()));
        }

        let number = invoice_number(record.id, record.created_at);
        Ok(InvoiceDto::from_record(record, number))
    }

    /// Full projection with site settings and tax breakdown (admin).
    pub async fn generate(&self, purchase_id: Uuid) -> Result<GeneratedInvoiceDto> {
        let record = self.fetch_record(purchase_id).await?;
        let settings = self.site_settings().await?;

        let (tax_amount, total) = apply_tax(record.amount, settings.tax_rate);

        Ok(GeneratedInvoiceDto {
            purchase_id: record.id,
            invoice_number: invoice_number(record.id, record.created_at),
            site_name: settings.site_name,
            currency: settings.currency,
            customer_name: record.user_name,
            customer_email: record.user_email,
            item_title: record.file_title,
            subtotal: record.amount,
            tax_rate: settings.tax_rate,
            tax_amount,
            total,
            status: record.status,
            issued_at: record.created_at,
        })
    }

    async fn fetch_record(&self, purchase_id: Uuid) -> Result<InvoiceRecord> {
        let record = sqlx::query_as::<_, InvoiceRecord>(&format!(
            r#"
            SELECT {INVOICE_COLUMNS}
            FROM purchases p
            LEFT JOIN files f ON f.id = p.file_id
            LEFT JOIN users u ON u.id = p.user_id
            WHERE p.id = $1
            "#
        ))
        .bind(purchase_id)
        .fetch_optional(&self.pool)
        .await?;

        record.ok_or_else(|| AppError::NotFound("Invoice not found".to_string()))
    }

    /// Settings rows are optional; missing or malformed values fall back to
    /// the defaults.
    async fn site_settings(&self) -> Result<SiteSettings> {
        let rows = sqlx::query_as::<_, (String, String)>(
            "SELECT key_name, value FROM site_settings WHERE key_name IN ('site_name', 'currency', 'tax_rate')",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut settings = SiteSettings::default();
        for (key, value) in rows {
            match key.as_str() {
                "site_name" => settings.site_name = value,
                "currency" => settings.currency = value,
                "tax_rate" => {
                    if let Ok(rate) = value.parse::<Decimal>() {
                        settings.tax_rate = rate;
                    }
                }
                _ => {}
            }
        }

        Ok(settings)
    }
}

fn invoice_number(purchase_id: Uuid, issued_at: DateTime<Utc>) -> String {
    let prefix = purchase_id.simple().to_string();
    format!(
        "INV-{}-{}",
        prefix[..8].to_uppercase(),
        issued_at.timestamp_millis()
    )
}

/// Tax rate is a percentage; returns (tax_amount, total).
fn apply_tax(subtotal: Decimal, tax_rate: Decimal) -> (Decimal, Decimal) {
    let tax_amount = (subtotal * tax_rate / Decimal::from(100)).round_dp(2);
    (tax_amount, subtotal + tax_amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tax_is_applied_as_percentage() {
        let (tax, total) = apply_tax(Decimal::new(10000, 2), Decimal::new(10, 0));
        assert_eq!(tax, Decimal::new(1000, 2));
        assert_eq!(total, Decimal::new(11000, 2));
    }

    #[test]
    fn zero_rate_means_no_tax() {
        let (tax, total) = apply_tax(Decimal::new(4999, 2), Decimal::ZERO);
        assert_eq!(tax, Decimal::ZERO);
        assert_eq!(total, Decimal::new(4999, 2));
    }

    #[test]
    fn tax_rounds_to_cents() {
        // 9.99 * 7.5% = 0.74925 -> 0.75
        let (tax, _) = apply_tax(Decimal::new(999, 2), Decimal::new(75, 1));
        assert_eq!(tax, Decimal::new(75, 2));
    }

    #[test]
    fn default_settings_match_fallbacks() {
        let settings = SiteSettings::default();
        assert_eq!(settings.site_name, "File Market");
        assert_eq!(settings.currency, "USD");
        assert_eq!(settings.tax_rate, Decimal::ZERO);
    }
}
