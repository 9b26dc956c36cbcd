//! Property-based tests for pagination

use proptest::prelude::*;
use vidtube::backend::pagination::{PageQuery, PageRequest, COMMENTS, VIDEOS};
use vidtube::backend::store::Slice;

proptest! {
    #[test]
    fn test_page_never_exceeds_limit(
        total in 0usize..200,
        page in 1usize..30,
        limit in 1usize..50,
    ) {
        let items: Vec<usize> = (0..total).collect();
        let request = PageRequest { page, limit };
        let result = VIDEOS.page(Slice::window(items, request.skip(), limit), request);

        prop_assert!(result.items.len() <= limit);
        prop_assert_eq!(result.total, total);
        prop_assert_eq!(result.total_pages, total.div_ceil(limit));
        prop_assert_eq!(result.has_next_page, page < result.total_pages);
        prop_assert_eq!(result.has_prev_page, page > 1);
        prop_assert_eq!(result.paging_counter, (page - 1) * limit + 1);
    }

    #[test]
    fn test_pages_cover_every_item_once(total in 0usize..120, limit in 1usize..25) {
        let items: Vec<usize> = (0..total).collect();
        let pages = total.div_ceil(limit).max(1);

        let mut seen = Vec::new();
        for page in 1..=pages {
            let request = PageRequest { page, limit };
            let slice = Slice::window(items.clone(), request.skip(), limit);
            seen.extend(COMMENTS.page(slice, request).items);
        }
        prop_assert_eq!(seen, items);
    }

    #[test]
    fn test_resolved_request_is_always_positive(
        page in proptest::option::of(".{0,6}"),
        limit in proptest::option::of(".{0,6}"),
    ) {
        let request = COMMENTS.resolve(&PageQuery { page, limit });
        prop_assert!(request.page >= 1);
        prop_assert!(request.limit >= 1);
    }

    #[test]
    fn test_numeric_query_is_honoured(page in 1usize..1000, limit in 1usize..1000) {
        let request = VIDEOS.resolve(&PageQuery {
            page: Some(page.to_string()),
            limit: Some(limit.to_string()),
        });
        prop_assert_eq!(request, PageRequest { page, limit });
    }

    #[test]
    fn test_any_page_number_is_safe(page in 1usize..=usize::MAX, limit in 1usize..100) {
        let request = PageRequest { page, limit };
        let items: Vec<usize> = (0..10).collect();
        let result = VIDEOS.page(Slice::window(items, request.skip(), limit), request);
        prop_assert!(result.paging_counter >= 1);
        prop_assert_eq!(result.has_prev_page, page > 1);
    }
}
