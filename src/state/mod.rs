//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageState`: outcome of each visited path-key (mirrored, non-HTML, failed, ...)

mod page_state;

pub use page_state::PageState;
