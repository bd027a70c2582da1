use rust_decimal::Decimal;
use sqlx::{Postgres, QueryBuilder};

/// One compiled search restriction. The same list is applied to the page
/// query and the count query so the two can never drift apart.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchFilter {
    /// Case-insensitive match against title, description or category name
    Text(String),
    CategorySlug(String),
    /// Only meaningful for paid files; free files fall outside any price range
    MinPrice(Decimal),
    MaxPrice(Decimal),
    IsFree(bool),
}

impl SearchFilter {
    pub fn apply(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            Self::Text(q) => {
                let pattern = like_pattern(q);
                qb.push(" AND (f.title ILIKE ");
                qb.push_bind(pattern.clone());
                qb.push(" OR f.description ILIKE ");
                qb.push_bind(pattern.clone());
                qb.push(" OR c.name ILIKE ");
                qb.push_bind(pattern);
                qb.push(")");
            }
            Self::CategorySlug(slug) => {
                qb.push(" AND c.slug = ");
                qb.push_bind(slug.clone());
            }
            Self::MinPrice(min) => {
                qb.push(" AND NOT f.is_free AND f.price >= ");
                qb.push_bind(*min);
            }
            Self::MaxPrice(max) => {
                qb.push(" AND NOT f.is_free AND f.price <= ");
                qb.push_bind(*max);
            }
            Self::IsFree(is_free) => {
                qb.push(" AND f.is_free = ");
                qb.push_bind(*is_free);
            }
        }
    }
}

/// Apply every filter in order to an open WHERE clause.
pub fn apply_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &[SearchFilter]) {
    for filter in filters {
        filter.apply(qb);
    }
}

/// Result ordering for the search page query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    Relevance,
    Newest,
    Oldest,
    PriceLow,
    PriceHigh,
    Popular,
}

impl SortBy {
    /// Unknown values silently fall back to relevance, matching lenient
    /// query-string handling.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("newest") => Self::Newest,
            Some("oldest") => Self::Oldest,
            Some("price_low") => Self::PriceLow,
            Some("price_high") => Self::PriceHigh,
            Some("popular") => Self::Popular,
            _ => Self::Relevance,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::PriceLow => "price_low",
            Self::PriceHigh => "price_high",
            Self::Popular => "popular",
        }
    }

    /// Push the ORDER BY clause. Relevance ranks title hits above description
    /// hits above category hits, ties broken newest-first; without a text
    /// query it degrades to newest.
    pub fn push_order_by(&self, qb: &mut QueryBuilder<'_, Postgres>, text_query: Option<&str>) {
        match self {
            Self::Relevance => match text_query {
                Some(q) => {
                    let pattern = like_pattern(q);
                    qb.push(" ORDER BY CASE WHEN f.title ILIKE ");
                    qb.push_bind(pattern.clone());
                    qb.push(" THEN 1 WHEN f.description ILIKE ");
                    qb.push_bind(pattern.clone());
                    qb.push(" THEN 2 WHEN c.name ILIKE ");
                    qb.push_bind(pattern);
                    qb.push(" THEN 3 ELSE 4 END, f.created_at DESC");
                }
                None => {
                    qb.push(" ORDER BY f.created_at DESC");
                }
            },
            Self::Newest => {
                qb.push(" ORDER BY f.created_at DESC");
            }
            Self::Oldest => {
                qb.push(" ORDER BY f.created_at ASC");
            }
            Self::PriceLow => {
                qb.push(" ORDER BY f.price ASC, f.created_at DESC");
            }
            Self::PriceHigh => {
                qb.push(" ORDER BY f.price DESC, f.created_at DESC");
            }
            Self::Popular => {
                qb.push(
                    " ORDER BY (SELECT COUNT(*) FROM purchases pu \
                     WHERE pu.file_id = f.id AND pu.status = 'completed') DESC, \
                     f.created_at DESC",
                );
            }
        }
    }
}

fn like_pattern(q: &str) -> String {
    format!("%{}%", q)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(filters: &[SearchFilter]) -> String {
        let mut qb = QueryBuilder::<Postgres>::new("WHERE 1=1");
        apply_filters(&mut qb, filters);
        qb.into_sql()
    }

    #[test]
    fn text_filter_matches_three_columns() {
        let sql = compile(&[SearchFilter::Text("icons".to_string())]);
        assert!(sql.contains("f.title ILIKE"));
        assert!(sql.contains("f.description ILIKE"));
        assert!(sql.contains("c.name ILIKE"));
    }

    #[test]
    fn price_filters_exclude_free_files() {
        let sql = compile(&[
            SearchFilter::MinPrice(Decimal::new(500, 2)),
            SearchFilter::MaxPrice(Decimal::new(2000, 2)),
        ]);
        assert_eq!(sql.matches("NOT f.is_free").count(), 2);
    }

    #[test]
    fn page_and_count_clauses_stay_in_sync() {
        let filters = vec![
            SearchFilter::Text("fonts".to_string()),
            SearchFilter::CategorySlug("design".to_string()),
            SearchFilter::IsFree(false),
        ];

        let mut page = QueryBuilder::<Postgres>::new("");
        let mut count = QueryBuilder::<Postgres>::new("");
        apply_filters(&mut page, &filters);
        apply_filters(&mut count, &filters);

        assert_eq!(page.into_sql(), count.into_sql());
    }

    #[test]
    fn sort_parsing_defaults_to_relevance() {
        assert_eq!(SortBy::parse(None), SortBy::Relevance);
        assert_eq!(SortBy::parse(Some("bogus")), SortBy::Relevance);
        assert_eq!(SortBy::parse(Some("newest")), SortBy::Newest);
        assert_eq!(SortBy::parse(Some("price_low")), SortBy::PriceLow);
        assert_eq!(SortBy::parse(Some("popular")), SortBy::Popular);
    }

    #[test]
    fn relevance_ranks_title_before_description() {
        let mut qb = QueryBuilder::<Postgres>::new("");
        SortBy::Relevance.push_order_by(&mut qb, Some("logo"));
        let sql = qb.into_sql();

        let title = sql.find("f.title ILIKE").unwrap();
        let description = sql.find("f.description ILIKE").unwrap();
        let category = sql.find("c.name ILIKE").unwrap();
        assert!(title < description && description < category);
        assert!(sql.contains("f.created_at DESC"));
    }

    #[test]
    fn relevance_without_query_degrades_to_newest() {
        let mut qb = QueryBuilder::<Postgres>::new("");
        SortBy::Relevance.push_order_by(&mut qb, None);
        assert_eq!(qb.into_sql(), " ORDER BY f.created_at DESC");
    }

    #[test]
    fn popular_orders_by_completed_purchases() {
        let mut qb = QueryBuilder::<Postgres>::new("");
        SortBy::Popular.push_order_by(&mut qb, None);
        let sql = qb.into_sql();
        assert!(sql.contains("pu.status = 'completed'"));
        assert!(sql.contains("COUNT(*)"));
    }
}
