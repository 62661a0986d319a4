//! Pagination utilities shared by services and handlers
//!
//! Provides a simple `Pagination` struct and helpers to normalize inputs.

use serde::Serialize;

/// Pagination parameters
#[derive(Clone, Copy, Debug)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page
    pub per_page: u32,
}

impl Pagination {
    /// Clamp to sane defaults and convert to `u64`
    pub fn normalize(self) -> (u64, u64) {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = self.per_page.clamp(1, 100);
        ((page - 1) as u64, per_page as u64)
    }

    /// Row offset for the normalized page
    pub fn offset(self) -> u64 {
        let (idx, per) = self.normalize();
        idx * per
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: 20 } }
}

/// One page of results plus the totals the frontend needs for its pager.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: u64, opts: Pagination) -> Self {
        let (idx, per) = opts.normalize();
        Self {
            data,
            total,
            page: (idx + 1) as u32,
            per_page: per as u32,
            total_pages: total.div_ceil(per),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Page, Pagination};

    #[test]
    fn normalize_clamps_zero_to_defaults() {
        let (idx, per) = Pagination { page: 0, per_page: 0 }.normalize();
        assert_eq!(idx, 0);
        assert_eq!(per, 1);
    }

    #[test]
    fn normalize_clamps_upper_bound() {
        let (idx, per) = Pagination { page: 5, per_page: 1000 }.normalize();
        assert_eq!(idx, 4);
        assert_eq!(per, 100);
    }

    #[test]
    fn default_values_are_sane() {
        let d = Pagination::default();
        assert_eq!(d.page, 1);
        assert_eq!(d.per_page, 20);
    }

    #[test]
    fn offset_follows_page_size() {
        assert_eq!(Pagination { page: 3, per_page: 12 }.offset(), 24);
        assert_eq!(Pagination { page: 0, per_page: 12 }.offset(), 0);
    }

    #[test]
    fn page_counts_partial_last_page() {
        let p = Page::new(vec![1, 2, 3], 25, Pagination { page: 3, per_page: 12 });
        assert_eq!(p.total_pages, 3);
        assert_eq!(p.page, 3);
        assert_eq!(p.per_page, 12);

        let empty: Page<u8> = Page::new(vec![], 0, Pagination { page: 1, per_page: 12 });
        assert_eq!(empty.total_pages, 0);
    }
}
