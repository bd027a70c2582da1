use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::core::error::Result;
use crate::features::search::dtos::{SearchQuery, SearchResponseDto, SuggestionQuery};
use crate::features::search::service::SearchService;
use crate::shared::types::ApiResponse;

/// Search the catalog
#[utoipa::path(
    get,
    path = "/search",
    tag = "search",
    params(
        ("q" = Option<String>, Query, description = "Text query"),
        ("category" = Option<String>, Query, description = "Category slug"),
        ("min_price" = Option<Decimal>, Query, description = "Minimum price (paid files only)"),
        ("max_price" = Option<Decimal>, Query, description = "Maximum price (paid files only)"),
        ("is_free" = Option<bool>, Query, description = "Free/paid filter"),
        ("sort_by" = Option<String>, Query, description = "relevance | newest | oldest | price_low | price_high | popular"),
        ("page" = Option<i64>, Query, description = "Page number"),
        ("limit" = Option<i64>, Query, description = "Items per page")
    ),
    responses(
        (status = 200, description = "Search results with applied filters", body = ApiResponse<SearchResponseDto>)
    )
)]
pub async fn search(
    State(service): State<Arc<SearchService>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<SearchResponseDto>>> {
    let results = service.search(query).await?;
    Ok(Json(ApiResponse::success(results)))
}

/// Title suggestions for a partial query
#[utoipa::path(
    get,
    path = "/search/suggestions",
    tag = "search",
    params(("q" = Option<String>, Query, description = "Partial query, at least 2 characters")),
    responses(
        (status = 200, description = "Matching titles", body = ApiResponse<Vec<String>>)
    )
)]
pub async fn suggestions(
    State(service): State<Arc<SearchService>>,
    Query(query): Query<SuggestionQuery>,
) -> Result<Json<ApiResponse<Vec<String>>>> {
    let titles = service.suggestions(query.q.as_deref()).await?;
    Ok(Json(ApiResponse::success(titles)))
}

/// Curated popular search terms
#[utoipa::path(
    get,
    path = "/search/popular",
    tag = "search",
    responses(
        (status = 200, description = "Popular search terms", body = ApiResponse<Vec<String>>)
    )
)]
pub async fn popular(
    State(service): State<Arc<SearchService>>,
) -> Result<Json<ApiResponse<Vec<String>>>> {
    Ok(Json(ApiResponse::success(service.popular_searches())))
}
