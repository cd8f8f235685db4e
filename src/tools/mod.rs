//! Agent tools
//!
//! Each tool takes `{"query": "<string>"}` and answers with JSON:
//!
//! | Tool | Query | Result |
//! |------|-------|--------|
//! | `box_text_rep` | file id | text representation or `null` |
//! | `box_file_search` | search query | documents |
//! | `box_folder_contents` | folder id | documents |
//! | `box_ai_ask_tool` | prompt | Box AI answer document |
//!
//! [`BoxToolkit`] builds the set that fits a configuration, sharing one
//! authenticated wrapper between them.

mod box_tools;
mod toolkit;

pub use box_tools::{BoxAiAskTool, BoxFileSearchTool, BoxFolderContentsTool, BoxTextRepTool};
pub use toolkit::BoxToolkit;

use crate::error::{Error, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

/// A callable tool an agent can discover and invoke
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name, a lowercase identifier with underscores
    fn name(&self) -> &str;

    /// One-line description for agent discovery
    fn description(&self) -> &str;

    /// JSON Schema of the parameters object
    fn parameters_schema(&self) -> Value {
        query_schema(self.query_description())
    }

    /// What the `query` parameter holds
    fn query_description(&self) -> &str;

    /// Run the tool
    async fn execute(&self, params: Value) -> Result<Value>;
}

/// Schema for a single required string parameter named `query`
pub fn query_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "query": {"type": "string", "description": description}
        },
        "required": ["query"]
    })
}

/// The non-blank `query` string of a tool call
pub fn query_param(params: &Value) -> Result<&str> {
    params
        .get("query")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| Error::invalid_argument("expected a non-empty string parameter 'query'"))
}
