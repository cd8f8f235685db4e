//! Query descriptors
//!
//! A [`QueryDescriptor`] names one retrieval a loader performs. It is built
//! once from validated configuration and never changed afterwards.

use crate::types::JsonObject;
use serde::{Deserialize, Serialize};

/// One Box retrieval operation and its arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryDescriptor {
    /// Text representations of specific files
    FileIds {
        /// File ids, in output order
        ids: Vec<String>,
    },

    /// Files in a folder
    Folder {
        /// Folder id (`0` is the root)
        id: String,
        /// Descend into sub-folders
        #[serde(default)]
        recursive: bool,
    },

    /// Full-text search
    Search {
        /// Search query
        query: String,
    },

    /// Metadata query against an enterprise template
    MetadataQuery {
        /// Query expression, e.g. `amount >= :value`
        query: String,
        /// Template key
        template: String,
        /// Values for the query's named parameters
        params: JsonObject,
        /// Enterprise owning the template
        enterprise_id: String,
    },

    /// Box AI question over a set of files
    AiAsk {
        /// Question to ask
        prompt: String,
        /// Files to ask about
        file_ids: Vec<String>,
    },
}

impl QueryDescriptor {
    /// Short label for logs
    pub fn label(&self) -> &'static str {
        match self {
            QueryDescriptor::FileIds { .. } => "file ids",
            QueryDescriptor::Folder { .. } => "folder",
            QueryDescriptor::Search { .. } => "search",
            QueryDescriptor::MetadataQuery { .. } => "metadata query",
            QueryDescriptor::AiAsk { .. } => "ai ask",
        }
    }
}
