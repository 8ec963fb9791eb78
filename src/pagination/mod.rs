//! Pagination module
//!
//! Walks the pages of a source search query.
//!
//! # Overview
//!
//! Pages are requested one at a time, starting at page 1, sorted by
//! creation time ascending so that an interrupted run can be resumed with
//! a narrower query without skipping or repeating images. The first empty
//! page ends the walk.

mod paginator;
mod types;

pub use paginator::QueryPaginator;
pub use types::PaginationState;
