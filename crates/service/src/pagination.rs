//! Pagination parameters shared by list operations.

use serde::Deserialize;

/// Pagination parameters, as accepted from a query string.
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
    /// Clamp to sane defaults and return `(page_index, page_size)` (0-based index).
    pub fn normalize(self) -> (u64, u64) {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = self.per_page.clamp(1, 100);
        ((page - 1) as u64, per_page as u64)
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: default_page(), per_page: default_per_page() } }
}
