/// Default number of items per page for list endpoints
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Hard cap on page size regardless of what the client asks for
pub const MAX_PAGE_SIZE: i64 = 100;

/// Search suggestions are capped at this many titles
pub const SUGGESTION_LIMIT: i64 = 10;

/// Queries shorter than this return no suggestions
pub const MIN_SUGGESTION_QUERY_LEN: usize = 2;

/// Password reset tokens are valid for one hour
pub const RESET_TOKEN_TTL_SECS: i64 = 3600;
