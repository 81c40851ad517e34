use serde::{Deserialize, Serialize};

use crate::error::ApiError;

const fn default_page() -> i64 {
    1
}

const fn default_limit() -> i64 {
    10
}

/// Pagination parameters shared by every listing endpoint. Both values are
/// 1-based and must be at least 1.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl PageQuery {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.page < 1 {
            return Err(ApiError::Validation("page must be at least 1".to_string()));
        }
        if self.limit < 1 {
            return Err(ApiError::Validation("limit must be at least 1".to_string()));
        }
        Ok(())
    }

    pub const fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// A page of results plus the bookkeeping the client needs to page further.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, query: &PageQuery, total: i64) -> Self {
        Self {
            items,
            page: query.page,
            size: query.limit,
            total,
            total_pages: (total + query.limit - 1) / query.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset() {
        let query = PageQuery { page: 1, limit: 10 };
        assert_eq!(query.offset(), 0);

        let query = PageQuery { page: 3, limit: 25 };
        assert_eq!(query.offset(), 50);
    }

    #[test]
    fn test_validate_rejects_zero_and_negative() {
        assert!(PageQuery { page: 0, limit: 10 }.validate().is_err());
        assert!(PageQuery { page: 1, limit: 0 }.validate().is_err());
        assert!(PageQuery { page: -1, limit: 10 }.validate().is_err());
        assert!(PageQuery { page: 1, limit: 10 }.validate().is_ok());
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let query = PageQuery { page: 1, limit: 10 };
        let page = Paginated::new(Vec::<i32>::new(), &query, 21);
        assert_eq!(page.total_pages, 3);

        let page = Paginated::new(Vec::<i32>::new(), &query, 20);
        assert_eq!(page.total_pages, 2);

        let page = Paginated::new(Vec::<i32>::new(), &query, 0);
        assert_eq!(page.total_pages, 0);
    }
}
