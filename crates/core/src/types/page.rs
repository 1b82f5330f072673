//! Paginated list responses.

use serde::{Deserialize, Serialize};

/// One page of a paginated list endpoint.
///
/// `count` is the total number of items across all pages, not the length of
/// `results`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub count: u64,
    #[serde(default)]
    pub current_page: u64,
    #[serde(default)]
    pub total_pages: u64,
    #[serde(default)]
    pub page_size: u64,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Returns `true` when this is the last page according to the server.
    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.current_page >= self.total_pages
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_page_deserializes_camel_case() {
        let page: Page<u32> = serde_json::from_str(
            r#"{"count":250,"currentPage":3,"totalPages":3,"pageSize":100,"results":[1,2]}"#,
        )
        .unwrap();
        assert_eq!(page.count, 250);
        assert_eq!(page.results, vec![1, 2]);
        assert!(page.is_last());
    }
}
