use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::analytics::{dtos as analytics_dtos, handlers as analytics_handlers};
use crate::features::analytics::models as analytics_models;
use crate::features::auth;
use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::downloads::{handlers as downloads_handlers, models as downloads_models};
use crate::features::files::{dtos as files_dtos, handlers as files_handlers};
use crate::features::invoices::{dtos as invoices_dtos, handlers as invoices_handlers};
use crate::features::payments::{dtos as payments_dtos, handlers as payments_handlers};
use crate::features::purchases::{dtos as purchases_dtos, handlers as purchases_handlers};
use crate::features::search::{dtos as search_dtos, handlers as search_handlers};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers};
use crate::shared::types::{ApiResponse, Pagination};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::forgot_password,
        auth::handlers::reset_password,
        auth::handlers::verify_email,
        auth::handlers::get_me,
        auth::handlers::logout,
        // Categories
        categories_handlers::list_categories,
        categories_handlers::get_category,
        categories_handlers::create_category,
        categories_handlers::update_category,
        categories_handlers::delete_category,
        // Files
        files_handlers::list_files,
        files_handlers::get_file,
        files_handlers::create_file,
        files_handlers::update_file,
        files_handlers::delete_file,
        // Purchases
        purchases_handlers::create_purchase,
        purchases_handlers::list_purchases,
        purchases_handlers::get_purchase,
        purchases_handlers::update_purchase_status,
        purchases_handlers::delete_purchase,
        // Payments
        payments_handlers::list_payment_methods,
        payments_handlers::list_all_payment_methods,
        payments_handlers::create_payment_method,
        payments_handlers::update_payment_method,
        payments_handlers::delete_payment_method,
        payments_handlers::create_payment,
        payments_handlers::verify_payment,
        payments_handlers::list_payments,
        payments_handlers::get_payment,
        payments_handlers::get_payment_invoice,
        // Downloads
        downloads_handlers::download_file,
        downloads_handlers::download_file_alias,
        downloads_handlers::download_history,
        // Invoices
        invoices_handlers::list_invoices,
        invoices_handlers::get_invoice,
        invoices_handlers::generate_invoice,
        // Search
        search_handlers::search,
        search_handlers::suggestions,
        search_handlers::popular,
        // Analytics
        analytics_handlers::dashboard,
        analytics_handlers::file_analytics,
        analytics_handlers::user_analytics,
        // Users
        users_handlers::get_profile,
        users_handlers::update_profile,
        users_handlers::change_password,
        users_handlers::list_users,
        users_handlers::delete_user,
    ),
    components(
        schemas(
            // Shared
            Pagination,
            // Auth
            auth::model::CurrentUser,
            auth::dtos::RegisterRequestDto,
            auth::dtos::LoginRequestDto,
            auth::dtos::ForgotPasswordDto,
            auth::dtos::ResetPasswordDto,
            auth::dtos::AuthResponseDto,
            auth::dtos::AuthUserDto,
            auth::dtos::MeResponseDto,
            ApiResponse<auth::dtos::AuthResponseDto>,
            ApiResponse<auth::dtos::MeResponseDto>,
            // Categories
            categories_dtos::CategoryResponseDto,
            categories_dtos::CreateCategoryDto,
            categories_dtos::UpdateCategoryDto,
            ApiResponse<Vec<categories_dtos::CategoryResponseDto>>,
            ApiResponse<categories_dtos::CategoryResponseDto>,
            // Files
            files_dtos::FileResponseDto,
            files_dtos::CreateFileDto,
            files_dtos::UpdateFileDto,
            files_handlers::FileListResponseDto,
            ApiResponse<files_dtos::FileResponseDto>,
            ApiResponse<files_handlers::FileListResponseDto>,
            // Purchases
            purchases_dtos::CreatePurchaseDto,
            purchases_dtos::UpdatePurchaseStatusDto,
            purchases_dtos::PurchaseResponseDto,
            purchases_handlers::PurchaseListResponseDto,
            ApiResponse<purchases_dtos::PurchaseResponseDto>,
            ApiResponse<purchases_handlers::PurchaseListResponseDto>,
            // Payments
            payments_dtos::PaymentMethodResponseDto,
            payments_dtos::CreatePaymentMethodDto,
            payments_dtos::UpdatePaymentMethodDto,
            payments_dtos::CreatePaymentDto,
            payments_dtos::VerifyPaymentDto,
            payments_dtos::PaymentResponseDto,
            payments_dtos::PaymentInvoiceDto,
            payments_handlers::PaymentListResponseDto,
            ApiResponse<Vec<payments_dtos::PaymentMethodResponseDto>>,
            ApiResponse<payments_dtos::PaymentMethodResponseDto>,
            ApiResponse<payments_dtos::PaymentResponseDto>,
            ApiResponse<payments_dtos::PaymentInvoiceDto>,
            ApiResponse<payments_handlers::PaymentListResponseDto>,
            // Downloads
            downloads_models::DownloadHistoryRecord,
            downloads_handlers::DownloadHistoryResponseDto,
            ApiResponse<downloads_handlers::DownloadHistoryResponseDto>,
            // Invoices
            invoices_dtos::InvoiceDto,
            invoices_dtos::GeneratedInvoiceDto,
            invoices_handlers::InvoiceListResponseDto,
            ApiResponse<invoices_dtos::InvoiceDto>,
            ApiResponse<invoices_dtos::GeneratedInvoiceDto>,
            ApiResponse<invoices_handlers::InvoiceListResponseDto>,
            // Search
            search_dtos::AppliedFiltersDto,
            search_dtos::SearchResponseDto,
            ApiResponse<search_dtos::SearchResponseDto>,
            ApiResponse<Vec<String>>,
            // Analytics
            analytics_models::OverviewRow,
            analytics_models::MonthlyPoint,
            analytics_models::TopFileRow,
            analytics_models::ActivityRow,
            analytics_models::FileSummaryRow,
            analytics_models::FileStatsRow,
            analytics_models::UserSummaryRow,
            analytics_models::UserStatsRow,
            analytics_models::PurchaseHistoryRow,
            analytics_dtos::DashboardDto,
            analytics_dtos::FileAnalyticsDto,
            analytics_dtos::UserAnalyticsDto,
            ApiResponse<analytics_dtos::DashboardDto>,
            ApiResponse<analytics_dtos::FileAnalyticsDto>,
            ApiResponse<analytics_dtos::UserAnalyticsDto>,
            // Users
            users_dtos::UserProfileDto,
            users_dtos::UpdateProfileDto,
            users_dtos::ChangePasswordDto,
            users_dtos::UserListItemDto,
            users_handlers::UserListResponseDto,
            ApiResponse<users_dtos::UserProfileDto>,
            ApiResponse<users_handlers::UserListResponseDto>,
        )
    ),
    tags(
        (name = "auth", description = "Registration, login and credential recovery"),
        (name = "categories", description = "File catalog categories"),
        (name = "files", description = "Digital file catalog"),
        (name = "purchases", description = "Purchase lifecycle"),
        (name = "payments", description = "Payment methods and manual payment verification"),
        (name = "downloads", description = "Entitlement checks and file delivery"),
        (name = "invoices", description = "Invoice projections over purchases"),
        (name = "search", description = "Catalog search and suggestions"),
        (name = "analytics", description = "Admin dashboards and aggregates"),
        (name = "users", description = "Profile self-service and admin user management"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "File Market API",
        version = "0.1.0",
        description = "API documentation for the File Market backend",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
