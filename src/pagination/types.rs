//! Pagination state

/// Tracks pagination state during a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationState {
    /// Last page fetched (0 before the first fetch)
    pub page: u32,
    /// Total reported by the first page; never updated afterwards
    pub total: Option<u64>,
    /// Images received so far
    pub total_fetched: u64,
    /// Set once an empty page has been seen
    pub done: bool,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Page number the next fetch should request
    pub fn next_page_number(&self) -> u32 {
        self.page + 1
    }

    /// Record a fetched page
    pub fn record_page(&mut self, page: u32, images: usize, total: u64) {
        self.page = page;
        self.total.get_or_insert(total);
        self.total_fetched += images as u64;
        if images == 0 {
            self.done = true;
        }
    }
}
