//! Pagination module
//!
//! Supports: Offset (folder items, search), Marker (metadata queries)
//!
//! # Overview
//!
//! Each strategy reads the next page position out of a response and tracks
//! when the collection is exhausted. [`collect_pages`] drives a strategy to
//! completion, or to an item cap when one is configured.

mod collect;
mod strategies;
mod types;

pub use collect::collect_pages;
pub use strategies::{MarkerPaginator, OffsetPaginator};
pub use types::{extract_jsonpath, NextPage, PageCursor, PaginationState, Paginator, StopCondition};
