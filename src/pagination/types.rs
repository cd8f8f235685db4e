//! Pagination types and traits
//!
//! Box pages collections two ways: offset/limit with a `total_count`
//! (folder items, search) and opaque markers (metadata queries). Both are
//! expressed through the [`Paginator`] trait so one driver can follow them.

use serde_json::Value;

/// Position of the page to request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageCursor {
    /// `offset` query parameter
    Offset(u64),
    /// `marker` body field; `None` on the first page
    Marker(Option<String>),
}

/// Result of the next page computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// More pages available at this cursor
    Continue(PageCursor),
    /// No more pages
    Done,
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

/// Stop conditions for pagination
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StopCondition {
    /// Stop when page is empty (no records)
    #[default]
    EmptyPage,

    /// Stop when the records fetched reach a total count in the body
    TotalCount {
        /// Dotted path to the total count field
        path: String,
    },
}

impl StopCondition {
    /// Create a total count stop condition
    pub fn total_count(path: impl Into<String>) -> Self {
        Self::TotalCount { path: path.into() }
    }

    /// Whether paging should stop after this response
    pub fn should_stop(&self, body: &Value, records_count: usize, state: &PaginationState) -> bool {
        if records_count == 0 {
            return true;
        }
        match self {
            StopCondition::EmptyPage => false,
            StopCondition::TotalCount { path } => extract_jsonpath(body, path)
                .and_then(|v| v.as_u64())
                .is_some_and(|total| state.offset + records_count as u64 >= total),
        }
    }
}

/// Tracks pagination state during iteration
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Offset of the current page
    pub offset: u64,
    /// Marker of the current page
    pub marker: Option<String>,
    /// Pages fetched so far
    pub pages: u32,
    /// Total records fetched so far
    pub total_fetched: u64,
    /// Is pagination complete?
    pub done: bool,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }

    /// Record a fetched page
    pub fn add_page(&mut self, records: usize) {
        self.pages += 1;
        self.total_fetched += records as u64;
    }
}

/// Core trait for pagination strategies
pub trait Paginator: Send + Sync {
    /// Items requested per page
    fn page_size(&self) -> u32;

    /// Dotted path of the records array in each page
    fn records_path(&self) -> &str {
        "entries"
    }

    /// Cursor for the first request
    fn first_page(&self) -> PageCursor;

    /// Process a response and determine if there's a next page
    fn process_response(
        &self,
        body: &Value,
        records_count: usize,
        state: &mut PaginationState,
    ) -> NextPage;
}

/// Look up a dotted path (`$.a.b` or `a.b`) in a JSON value
pub fn extract_jsonpath<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return Some(value);
    }
    path.split('.').try_fold(value, |current, part| match current {
        Value::Object(map) => map.get(part),
        Value::Array(items) => part.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}
