//! Pagination utilities
//!
//! `Pagination` normalizes query inputs; `PaginatedList` slices an in-memory
//! list into one page and reports the page boundaries.

use serde::{Deserialize, Serialize};

/// Pagination parameters
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Pagination {
    /// 1-based page index
    #[serde(default = "default_page")]
    pub page: u32,
    /// items per page
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 { 1 }
fn default_per_page() -> u32 { 20 }

impl Pagination {
    /// Clamp to sane defaults: page 0 becomes 1, per_page is kept within 1..=100.
    pub fn normalize(self) -> (u32, u32) {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = self.per_page.clamp(1, 100);
        (page, per_page)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: default_page(), per_page: default_per_page() } }
}

/// One page of a list.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PaginatedList<T> {
    pub items: Vec<T>,
    pub page_index: u32,
    pub page_size: u32,
    pub total_items: usize,
    pub total_pages: u32,
    pub has_previous_page: bool,
    pub has_next_page: bool,
}

impl<T> PaginatedList<T> {
    /// Slice `source` into the page described by `opts`.
    ///
    /// A page past the end yields an empty `items` list; the counters still
    /// describe the whole source.
    pub fn create(source: Vec<T>, opts: Pagination) -> Self {
        let (page_index, page_size) = opts.normalize();
        let total_items = source.len();
        let total_pages = total_items.div_ceil(page_size as usize) as u32;
        let skip = (page_index as usize - 1).saturating_mul(page_size as usize);
        let items = source.into_iter().skip(skip).take(page_size as usize).collect();
        Self {
            items,
            page_index,
            page_size,
            total_items,
            total_pages,
            has_previous_page: page_index > 1,
            has_next_page: page_index < total_pages,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedList<U> {
        PaginatedList {
            items: self.items.into_iter().map(f).collect(),
            page_index: self.page_index,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
            has_previous_page: self.has_previous_page,
            has_next_page: self.has_next_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PaginatedList, Pagination};

    fn page(n: usize, page: u32, per_page: u32) -> PaginatedList<usize> {
        PaginatedList::create((0..n).collect(), Pagination { page, per_page })
    }

    #[test]
    fn normalize_clamps_zero_to_defaults() {
        let (idx, per) = Pagination { page: 0, per_page: 0 }.normalize();
        assert_eq!(idx, 1);
        assert_eq!(per, 1);
    }

    #[test]
    fn normalize_clamps_upper_bound() {
        let (idx, per) = Pagination { page: 5, per_page: 1000 }.normalize();
        assert_eq!(idx, 5);
        assert_eq!(per, 100);
    }

    #[test]
    fn default_values_are_sane() {
        let d = Pagination::default();
        assert_eq!(d.page, 1);
        assert_eq!(d.per_page, 20);
    }

    #[test]
    fn total_pages_is_ceiling_division() {
        assert_eq!(page(10, 1, 3).total_pages, 4);
        assert_eq!(page(9, 1, 3).total_pages, 3);
        assert_eq!(page(1, 1, 3).total_pages, 1);
        assert_eq!(page(0, 1, 3).total_pages, 0);
    }

    #[test]
    fn first_page_has_only_next() {
        let p = page(10, 1, 3);
        assert_eq!(p.items, vec![0, 1, 2]);
        assert!(!p.has_previous_page);
        assert!(p.has_next_page);
    }

    #[test]
    fn last_page_has_only_previous_and_remainder() {
        let p = page(10, 4, 3);
        assert_eq!(p.items, vec![9]);
        assert!(p.has_previous_page);
        assert!(!p.has_next_page);
    }

    #[test]
    fn middle_page_has_both_flags() {
        let p = page(10, 2, 3);
        assert_eq!(p.items, vec![3, 4, 5]);
        assert!(p.has_previous_page && p.has_next_page);
    }

    #[test]
    fn single_page_has_no_flags() {
        let p = page(3, 1, 3);
        assert_eq!(p.total_pages, 1);
        assert!(!p.has_previous_page && !p.has_next_page);
    }

    #[test]
    fn page_past_end_is_empty() {
        let p = page(4, 9, 2);
        assert!(p.items.is_empty());
        assert_eq!(p.total_items, 4);
        assert!(p.has_previous_page);
        assert!(!p.has_next_page);
    }

    #[test]
    fn map_keeps_counters() {
        let p = page(5, 2, 2).map(|n| n * 10);
        assert_eq!(p.items, vec![20, 30]);
        assert_eq!(p.total_pages, 3);
    }
}
