use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: i64 = 10;
pub const DEFAULT_PAGE: i64 = 1;
pub const MAX_LIMIT: i64 = 100;

/// Raw `?limit=&page=` values. Kept as strings so junk input falls back to
/// defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: i64,
    pub page: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            page: DEFAULT_PAGE,
        }
    }
}

impl PageRequest {
    pub fn new(limit: i64, page: i64) -> Self {
        Self {
            limit: if limit > 0 { limit.min(MAX_LIMIT) } else { DEFAULT_LIMIT },
            page: if page > 0 { page } else { DEFAULT_PAGE },
        }
    }

    /// Saturates; an offset past the last row yields an empty page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl From<PageQuery> for PageRequest {
    fn from(query: PageQuery) -> Self {
        let limit = parse_positive(query.limit.as_deref()).unwrap_or(DEFAULT_LIMIT);
        let page = parse_positive(query.page.as_deref()).unwrap_or(DEFAULT_PAGE);
        Self::new(limit, page)
    }
}

fn parse_positive(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|value| *value > 0)
}

#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total_items: i64,
    pub total_pages: i64,
    pub page: i64,
    pub limit: i64,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total_items: i64, request: PageRequest) -> Self {
        let limit = request.limit.max(1);
        let total_items = total_items.max(0);
        let total_pages = total_items / limit + i64::from(total_items % limit != 0);
        Self {
            data,
            total_items,
            total_pages,
            page: request.page,
            limit: request.limit,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            total_items: self.total_items,
            total_pages: self.total_pages,
            page: self.page,
            limit: self.limit,
        }
    }
}
