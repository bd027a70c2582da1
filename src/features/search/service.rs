use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::core::error::Result;
use crate::features::files::models::FileRecord;
use crate::features::search::dtos::{AppliedFiltersDto, SearchQuery, SearchResponseDto};
use crate::features::search::filters::{apply_filters, SearchFilter, SortBy};
use crate::shared::constants::{DEFAULT_PAGE_SIZE, MIN_SUGGESTION_QUERY_LEN, SUGGESTION_LIMIT};
use crate::shared::types::{Pagination, PaginationQuery};

const FILE_COLUMNS: &str = "f.id, f.title, f.description, f.category_id, c.name AS category_name, \
     f.price, f.is_free, f.file_name, f.file_path, f.file_size, f.file_type, f.preview_url, \
     f.download_url, f.is_downloadable, f.download_limit_days, f.created_at, f.updated_at";

/// Curated fallback shown before the user has typed anything
const POPULAR_SEARCHES: &[&str] = &[
    "templates",
    "ebooks",
    "icons",
    "fonts",
    "presets",
    "mockups",
    "wallpapers",
    "courses",
];

/// Catalog search over files and categories
pub struct SearchService {
    pool: PgPool,
}

impl SearchService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn search(&self, query: SearchQuery) -> Result<SearchResponseDto> {
        let pagination_query = PaginationQuery {
            page: query.page.unwrap_or(1),
            limit: query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        };

        let text = query
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string);
        let sort_by = SortBy::parse(query.sort_by.as_deref());
        let filters = compile_filters(&text, &query);

        // Count and page share the exact same filter list.
        let mut count_qb = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM files f LEFT JOIN categories c ON c.id = f.category_id WHERE 1=1",
        );
        apply_filters(&mut count_qb, &filters);
        let total: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        let mut page_qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {FILE_COLUMNS} FROM files f LEFT JOIN categories c ON c.id = f.category_id WHERE 1=1"
        ));
        apply_filters(&mut page_qb, &filters);
        sort_by.push_order_by(&mut page_qb, text.as_deref());
        page_qb.push(" LIMIT ");
        page_qb.push_bind(pagination_query.limit());
        page_qb.push(" OFFSET ");
        page_qb.push_bind(pagination_query.offset());

        let files: Vec<FileRecord> = page_qb
            .build_query_as()
            .fetch_all(&self.pool)
            .await?;

        let pagination = Pagination::new(&pagination_query, total);

        Ok(SearchResponseDto {
            files: files.into_iter().map(Into::into).collect(),
            pagination,
            filters: AppliedFiltersDto {
                q: text,
                category: query.category,
                min_price: query.min_price,
                max_price: query.max_price,
                is_free: query.is_free,
                sort_by: sort_by.as_str().to_string(),
            },
        })
    }

    /// Distinct titles containing the query; short queries get an empty list
    /// rather than an error.
    pub async fn suggestions(&self, q: Option<&str>) -> Result<Vec<String>> {
        let q = q.map(str::trim).unwrap_or_default();
        if q.len() < MIN_SUGGESTION_QUERY_LEN {
            return Ok(Vec::new());
        }

        let titles = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT title FROM files
            WHERE title ILIKE $1
            ORDER BY title
            LIMIT $2
            "#,
        )
        .bind(format!("%{}%", q))
        .bind(SUGGESTION_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        Ok(titles)
    }

    pub fn popular_searches(&self) -> Vec<String> {
        POPULAR_SEARCHES.iter().map(|s| s.to_string()).collect()
    }
}

fn compile_filters(text: &Option<String>, query: &SearchQuery) -> Vec<SearchFilter> {
    let mut filters = Vec::new();

    if let Some(q) = text {
        filters.push(SearchFilter::Text(q.clone()));
    }
    if let Some(slug) = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        filters.push(SearchFilter::CategorySlug(slug.to_string()));
    }
    if let Some(min) = query.min_price {
        filters.push(SearchFilter::MinPrice(min));
    }
    if let Some(max) = query.max_price {
        filters.push(SearchFilter::MaxPrice(max));
    }
    if let Some(is_free) = query.is_free {
        filters.push(SearchFilter::IsFree(is_free));
    }

    filters
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn blank_text_produces_no_text_filter() {
        let query = SearchQuery {
            q: Some("   ".to_string()),
            ..Default::default()
        };
        let text = query
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_string);

        assert!(text.is_none());
        assert!(compile_filters(&text, &query).is_empty());
    }

    #[test]
    fn all_parameters_compile_in_order() {
        let query = SearchQuery {
            q: Some("logo".to_string()),
            category: Some("design".to_string()),
            min_price: Some(Decimal::ONE),
            max_price: Some(Decimal::TEN),
            is_free: Some(false),
            ..Default::default()
        };

        let filters = compile_filters(&Some("logo".to_string()), &query);
        assert_eq!(
            filters,
            vec![
                SearchFilter::Text("logo".to_string()),
                SearchFilter::CategorySlug("design".to_string()),
                SearchFilter::MinPrice(Decimal::ONE),
                SearchFilter::MaxPrice(Decimal::TEN),
                SearchFilter::IsFree(false),
            ]
        );
    }

    #[test]
    fn popular_searches_are_static() {
        assert!(POPULAR_SEARCHES.contains(&"templates"));
        assert!(POPULAR_SEARCHES.len() <= SUGGESTION_LIMIT as usize);
    }
}
