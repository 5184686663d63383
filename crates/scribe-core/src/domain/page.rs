use serde::{Deserialize, Serialize};

/// Zero-based page request with a bounded size.
///
/// Bounds are applied by the caller (API configuration); repositories treat
/// the values as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
}

impl PageRequest {
    pub fn new(page: u64, size: u64) -> Self {
        Self { page, size }
    }

    /// Number of items to skip before this page starts.
    ///
    /// Saturates rather than overflowing: page numbers are caller-controlled
    /// and a past-the-end page is an empty page, not a panic.
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }
}

/// A bounded slice of a result set plus total-count metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub size: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Assemble a page, deriving `total_pages` from the total item count.
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        let size = request.size.max(1);
        Self {
            items,
            page: request.page,
            size: request.size,
            total_items,
            total_pages: total_items.div_ceil(size),
        }
    }

    /// Map every item, keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}
