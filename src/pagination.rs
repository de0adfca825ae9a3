use serde::{Deserialize, Serialize};

/// Paging information returned alongside a list of products
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total_items: u64,
    pub total_pages: u64,
    pub next_page: Option<u32>,
    pub previous_page: Option<u32>,
}

impl Pagination {
    /// `page` is 1-based and `page_size` must be positive.
    pub fn new(page: u32, page_size: u32, total_items: u64) -> Self {
        let total_pages = total_items.div_ceil(u64::from(page_size.max(1)));

        let next_page = match u64::from(page) < total_pages {
            true => page.checked_add(1),
            false => None,
        };

        let previous_page = match page > 1 {
            true => Some(page - 1),
            false => None,
        };

        Pagination {
            page,
            page_size,
            total_items,
            total_pages,
            next_page,
            previous_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_middle_page() {
        assert_eq!(
            Pagination::new(2, 1, 3),
            Pagination {
                page: 2,
                page_size: 1,
                total_items: 3,
                total_pages: 3,
                next_page: Some(3),
                previous_page: Some(1),
            }
        );
    }

    #[test]
    fn test_empty_result() {
        let pagination = Pagination::new(1, 10, 0);
        assert_eq!(pagination.total_pages, 0);
        assert_eq!(pagination.next_page, None);
        assert_eq!(pagination.previous_page, None);
    }

    #[test]
    fn test_past_last_page() {
        let pagination = Pagination::new(7, 10, 25);
        assert_eq!(pagination.total_pages, 3);
        assert_eq!(pagination.next_page, None);
        assert_eq!(pagination.previous_page, Some(6));
    }

    #[test]
    fn test_serializes_camel_case_with_nulls() {
        let json = serde_json::to_value(Pagination::new(1, 10, 4)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "page": 1,
                "pageSize": 10,
                "totalItems": 4,
                "totalPages": 1,
                "nextPage": null,
                "previousPage": null,
            })
        );
    }

    proptest! {
        #[test]
        fn prop_total_pages_is_ceiling(total in 0u64..100_000, size in 1u32..500) {
            let pagination = Pagination::new(1, size, total);
            let size = u64::from(size);
            prop_assert!(pagination.total_pages * size >= total);
            prop_assert!(pagination.total_pages == 0 || (pagination.total_pages - 1) * size < total);
        }

        #[test]
        fn prop_neighbors(page in 1u32..1_000, size in 1u32..100, total in 0u64..50_000) {
            let pagination = Pagination::new(page, size, total);

            prop_assert_eq!(
                pagination.next_page.is_some(),
                u64::from(page) < pagination.total_pages
            );
            if let Some(next) = pagination.next_page {
                prop_assert_eq!(next, page + 1);
            }

            prop_assert_eq!(pagination.previous_page.is_some(), page > 1);
            if let Some(previous) = pagination.previous_page {
                prop_assert_eq!(previous, page - 1);
            }
        }
    }
}
