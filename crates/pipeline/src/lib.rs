//! Sequence helpers for the aggregation pipeline.
//!
//! This crate provides:
//! - `paginate`: offset/limit slicing of the id list returned by the index
//! - `batch`: splitting ids into bounded chunks for the batched upstreams
//!
//! ## Architecture
//! The aggregation engine runs ids through both stages in order:
//! 1. The full id list is paginated down to the requested page
//! 2. The page is split into batches that each fit in one upstream request
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{split, Page};
//!
//! let page = Page::new(Some(5), Some(10)).apply(&ids);
//! for batch in split(page, 5) {
//!     // one upstream request per batch
//! }
//! ```

pub mod batch;
pub mod paginate;

// Re-export main types
pub use batch::split;
pub use paginate::{filter, Page};
