use serde::{Deserialize, Serialize};

/// Paged list envelope returned by every list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPage<T> {
    /// Items on the current page.
    pub items: Vec<T>,
    /// Total number of items across all pages.
    pub total: u64,
    /// One-based page number.
    #[serde(default = "first_page")]
    pub page: u32,
    /// Requested page size.
    #[serde(default)]
    pub page_size: u32,
}

impl<T> ListPage<T> {
    /// Returns whether more pages follow the current one.
    #[must_use]
    pub fn has_more(&self) -> bool {
        if self.page_size == 0 {
            return false;
        }

        u64::from(self.page).saturating_mul(u64::from(self.page_size)) < self.total
    }

    /// Maps page items while keeping paging metadata.
    pub fn map<U>(self, transform: impl FnMut(T) -> U) -> ListPage<U> {
        ListPage {
            items: self.items.into_iter().map(transform).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// Paging parameters for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRequest {
    /// One-based page number.
    pub page: u32,
    /// Page size.
    pub page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 25,
        }
    }
}

fn first_page() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::ListPage;

    #[test]
    fn has_more_compares_consumed_items_with_total() {
        let page = ListPage {
            items: vec![1, 2],
            total: 5,
            page: 1,
            page_size: 2,
        };
        assert!(page.has_more());

        let last = ListPage {
            items: vec![5],
            total: 5,
            page: 3,
            page_size: 2,
        };
        assert!(!last.has_more());
    }

    #[test]
    fn envelope_without_paging_fields_defaults_to_first_page() {
        let page: Result<ListPage<u32>, _> =
            serde_json::from_str(r#"{"items":[1,2,3],"total":3}"#);
        assert!(matches!(page, Ok(page) if page.page == 1 && page.page_size == 0));
    }
}
