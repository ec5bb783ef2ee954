//! Pagination utilities for service layer
//!
//! Provides a simple `Pagination` struct and helpers to normalize inputs.

use serde::Deserialize;

/// Upper bound on `per_page` accepted from callers.
pub const MAX_PER_PAGE: u32 = 100;

/// Pagination parameters
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page index
    #[serde(default = "default_page")]
    pub page: u32,
    /// items per page
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 { 1 }
fn default_per_page() -> u32 { 10 }

impl Pagination {
    /// Clamp to sane defaults and return the 0-based page index and page size.
    pub fn normalize(self) -> (u64, u64) {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = self.per_page.clamp(1, MAX_PER_PAGE);
        ((page - 1) as u64, per_page as u64)
    }

    /// Row offset of the first item on the page.
    pub fn offset(self) -> u64 {
        let (page_idx, per_page) = self.normalize();
        page_idx * per_page
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: default_page(), per_page: default_per_page() } }
}

#[cfg(test)]
mod tests {
    use super::Pagination;

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
    fn default_values_match_http_defaults() {
        let d = Pagination::default();
        assert_eq!(d.page, 1);
        assert_eq!(d.per_page, 10);
    }

    #[test]
    fn offset_is_page_minus_one_times_size() {
        assert_eq!(Pagination { page: 3, per_page: 10 }.offset(), 20);
        assert_eq!(Pagination { page: 1, per_page: 10 }.offset(), 0);
    }

    #[test]
    fn deserializes_missing_fields_as_defaults() {
        let p: Pagination = serde_json::from_str(r#"{"page": 2}"#).unwrap();
        assert_eq!(p, Pagination { page: 2, per_page: 10 });
    }
}
