/**
 * Paginator
 *
 * Turns a store window and its total count into a page with cursor math.
 *
 * `page` and `limit` arrive as raw query strings. A value that fails to
 * parse, or parses below 1, falls back to the call-site default. Item and
 * total labels are chosen by the caller, so a video listing serializes as
 *
 * ```json
 * {
 *   "videos": [...], "totalVideos": 15, "limit": 12, "page": 2,
 *   "totalPages": 2, "pagingCounter": 13, "hasPrevPage": true,
 *   "hasNextPage": false, "prevPage": 1, "nextPage": null
 * }
 * ```
 */

use std::fmt::Display;

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use crate::backend::error::BackendError;
use crate::backend::store::Slice;

/// Raw `page` / `limit` query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Resolved, always-valid page coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl PageRequest {
    /// Number of items before this page
    pub fn skip(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// Labelled paginator for one listing endpoint
#[derive(Debug, Clone, Copy)]
pub struct Paginator {
    pub items_label: &'static str,
    pub total_label: &'static str,
    pub default_limit: usize,
}

/// Comment listings: 10 per page
pub const COMMENTS: Paginator = Paginator {
    items_label: "comments",
    total_label: "totalComments",
    default_limit: 10,
};

/// Video listings: 12 per page
pub const VIDEOS: Paginator = Paginator {
    items_label: "videos",
    total_label: "totalVideos",
    default_limit: 12,
};

fn parse_positive(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|value| *value >= 1)
}

impl Paginator {
    pub fn resolve(&self, query: &PageQuery) -> PageRequest {
        PageRequest {
            page: parse_positive(query.page.as_deref()).unwrap_or(1),
            limit: parse_positive(query.limit.as_deref()).unwrap_or(self.default_limit),
        }
    }

    /// Build the requested page from a store window and its total count
    pub fn page<T>(&self, slice: Slice<T>, request: PageRequest) -> Page<T> {
        let request = PageRequest {
            page: request.page.max(1),
            limit: request.limit.max(1),
        };
        let total_pages = slice.total.div_ceil(request.limit);

        Page {
            items_label: self.items_label,
            total_label: self.total_label,
            items: slice.items,
            total: slice.total,
            page: request.page,
            limit: request.limit,
            total_pages,
            has_prev_page: request.page > 1,
            has_next_page: request.page < total_pages,
            paging_counter: request.skip().saturating_add(1),
        }
    }

    /// Paginate the outcome of a recipe.
    ///
    /// A failed recipe becomes a generic 500; its cause is logged only.
    pub fn paginate<T, E: Display>(
        &self,
        slice: Result<Slice<T>, E>,
        request: PageRequest,
    ) -> Result<Page<T>, BackendError> {
        match slice {
            Ok(slice) => Ok(self.page(slice, request)),
            Err(e) => {
                tracing::error!("Failed to paginate {}: {}", self.items_label, e);
                Err(BackendError::internal("Failed to paginate"))
            }
        }
    }
}

/// One page of results
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    items_label: &'static str,
    total_label: &'static str,
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub total_pages: usize,
    pub has_prev_page: bool,
    pub has_next_page: bool,
    pub paging_counter: usize,
}

impl<T> Page<T> {
    pub fn prev_page(&self) -> Option<usize> {
        self.has_prev_page.then(|| self.page - 1)
    }

    pub fn next_page(&self) -> Option<usize> {
        self.has_next_page.then(|| self.page.saturating_add(1))
    }
}

impl<T: Serialize> Serialize for Page<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(10))?;
        map.serialize_entry(self.items_label, &self.items)?;
        map.serialize_entry(self.total_label, &self.total)?;
        map.serialize_entry("limit", &self.limit)?;
        map.serialize_entry("page", &self.page)?;
        map.serialize_entry("totalPages", &self.total_pages)?;
        map.serialize_entry("pagingCounter", &self.paging_counter)?;
        map.serialize_entry("hasPrevPage", &self.has_prev_page)?;
        map.serialize_entry("hasNextPage", &self.has_next_page)?;
        map.serialize_entry("prevPage", &self.prev_page())?;
        map.serialize_entry("nextPage", &self.next_page())?;
        map.end()
    }
}
