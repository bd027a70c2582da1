use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::files::dtos::FileResponseDto;
use crate::shared::types::Pagination;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SearchQuery {
    pub q: Option<String>,
    /// Category slug
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub is_free: Option<bool>,
    pub sort_by: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// The applied filters echoed back so clients can render search state
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppliedFiltersDto {
    pub q: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub is_free: Option<bool>,
    pub sort_by: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponseDto {
    pub files: Vec<FileResponseDto>,
    pub pagination: Pagination,
    pub filters: AppliedFiltersDto,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SuggestionQuery {
    pub q: Option<String>,
}
