//! Page-following driver
//!
//! [`collect_pages`] asks the caller for one page at a time and lets the
//! [`Paginator`] decide when to stop, honouring an optional item cap.

use super::types::{extract_jsonpath, NextPage, PageCursor, PaginationState, Paginator};
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use tracing::{debug, warn};

/// Fetch every page and deserialize the records of each.
///
/// `fetch` receives the cursor of the page to load and returns the raw
/// response body. When `max_items` is reached the walk stops early and a
/// warning names what was cut short.
pub async fn collect_pages<T, F, Fut>(
    paginator: &dyn Paginator,
    max_items: Option<usize>,
    what: &str,
    mut fetch: F,
) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    F: FnMut(PageCursor) -> Fut,
    Fut: Future<Output = Result<Value>>,
{
    let mut state = PaginationState::new();
    let mut items: Vec<T> = Vec::new();
    let mut cursor = paginator.first_page();

    loop {
        let body = fetch(cursor).await?;

        let records = match extract_jsonpath(&body, paginator.records_path()) {
            Some(Value::Array(records)) => records.clone(),
            Some(Value::Null) | None => Vec::new(),
            Some(other) => {
                return Err(Error::decode(format!(
                    "expected an array at '{}' in {what} page, got {other}",
                    paginator.records_path()
                )))
            }
        };
        let count = records.len();

        for record in records {
            let item = serde_json::from_value(record)
                .map_err(|e| Error::decode(format!("invalid {what} entry: {e}")))?;
            items.push(item);
        }

        let next = paginator.process_response(&body, count, &mut state);
        debug!(
            "Fetched {} page {} ({} records, {} total)",
            what, state.pages, count, state.total_fetched
        );

        if let Some(max) = max_items {
            if items.len() >= max {
                if items.len() > max || !next.is_done() {
                    warn!(
                        "Stopped reading {} after {} items; more results are available",
                        what, max
                    );
                }
                items.truncate(max);
                return Ok(items);
            }
        }

        match next {
            NextPage::Continue(next_cursor) => cursor = next_cursor,
            NextPage::Done => return Ok(items),
        }
    }
}
