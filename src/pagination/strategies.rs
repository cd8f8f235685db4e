//! Pagination strategy implementations

use super::types::{
    extract_jsonpath, NextPage, PageCursor, PaginationState, Paginator, StopCondition,
};
use serde_json::Value;
use tracing::warn;

// ============================================================================
// Offset Pagination
// ============================================================================

/// Offset/limit pagination used by folder listings and search
///
/// `?offset=200&limit=100`, stopping at `total_count` or on a short page.
#[derive(Debug, Clone)]
pub struct OffsetPaginator {
    /// Number of records per page
    pub limit_value: u32,
    /// Stop condition
    pub stop_condition: StopCondition,
    /// Largest offset the endpoint accepts
    pub max_offset: Option<u64>,
}

impl OffsetPaginator {
    /// Create a new offset paginator
    pub fn new(limit_value: u32, stop_condition: StopCondition) -> Self {
        Self {
            limit_value: limit_value.max(1),
            stop_condition,
            max_offset: None,
        }
    }

    /// Offset paging that stops at the body's `total_count`
    pub fn with_total_count(limit_value: u32) -> Self {
        Self::new(limit_value, StopCondition::total_count("total_count"))
    }

    /// Never request a page beyond `max_offset`
    #[must_use]
    pub fn with_max_offset(mut self, max_offset: u64) -> Self {
        self.max_offset = Some(max_offset);
        self
    }
}

impl Paginator for OffsetPaginator {
    fn page_size(&self) -> u32 {
        self.limit_value
    }

    fn first_page(&self) -> PageCursor {
        PageCursor::Offset(0)
    }

    fn process_response(
        &self,
        body: &Value,
        records_count: usize,
        state: &mut PaginationState,
    ) -> NextPage {
        state.add_page(records_count);

        if self
            .stop_condition
            .should_stop(body, records_count, state)
            || records_count < self.limit_value as usize
        {
            state.mark_done();
            return NextPage::Done;
        }

        let next_offset = state.offset + records_count as u64;
        if let Some(max_offset) = self.max_offset.filter(|max| next_offset > *max) {
            warn!(
                "Stopped paging at offset {}; the endpoint accepts offsets up to {}",
                state.offset, max_offset
            );
            state.mark_done();
            return NextPage::Done;
        }

        state.offset = next_offset;
        NextPage::Continue(PageCursor::Offset(state.offset))
    }
}

// ============================================================================
// Marker Pagination
// ============================================================================

/// Marker pagination used by metadata queries
///
/// The response carries an opaque `next_marker`; an absent, null or empty
/// marker ends the walk.
#[derive(Debug, Clone)]
pub struct MarkerPaginator {
    /// Number of records per page
    pub limit_value: u32,
    /// Dotted path to the next marker
    pub marker_path: String,
}

impl MarkerPaginator {
    /// Create a new marker paginator
    pub fn new(limit_value: u32, marker_path: impl Into<String>) -> Self {
        Self {
            limit_value: limit_value.max(1),
            marker_path: marker_path.into(),
        }
    }
}

impl Paginator for MarkerPaginator {
    fn page_size(&self) -> u32 {
        self.limit_value
    }

    fn first_page(&self) -> PageCursor {
        PageCursor::Marker(None)
    }

    fn process_response(
        &self,
        body: &Value,
        records_count: usize,
        state: &mut PaginationState,
    ) -> NextPage {
        state.add_page(records_count);

        let marker = extract_jsonpath(body, &self.marker_path)
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty());

        match marker {
            Some(marker) if records_count > 0 => {
                // A repeated marker would loop forever
                if state.marker.as_deref() == Some(marker) {
                    state.mark_done();
                    return NextPage::Done;
                }
                state.marker = Some(marker.to_string());
                NextPage::Continue(PageCursor::Marker(Some(marker.to_string())))
            }
            _ => {
                state.mark_done();
                NextPage::Done
            }
        }
    }
}
