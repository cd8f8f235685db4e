//! Box tool implementations

use super::{query_param, Tool};
use crate::api::BoxApiWrapper;
use crate::config::BoxConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

// ============================================================================
// Text representation
// ============================================================================

/// Text representation of a single file
#[derive(Debug, Clone)]
pub struct BoxTextRepTool {
    api: Arc<BoxApiWrapper>,
}

impl BoxTextRepTool {
    /// Validate the credentials in `config` and build the tool
    pub fn new(config: &BoxConfig) -> Result<Self> {
        Ok(Self::with_api(Arc::new(BoxApiWrapper::from_config(config)?)))
    }

    /// Build the tool over an existing wrapper
    pub fn with_api(api: Arc<BoxApiWrapper>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for BoxTextRepTool {
    fn name(&self) -> &str {
        "box_text_rep"
    }

    fn description(&self) -> &str {
        "Retrieve the text representation of a Box file. Set query to the id of the file."
    }

    fn query_description(&self) -> &str {
        "Box file id, e.g. '1169680553945'. Do not include any other text."
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let file_id = query_param(&params)?;
        debug!("box_text_rep for file {}", file_id);
        let rep = self.api.get_text_representation(file_id).await?;
        Ok(serde_json::to_value(rep)?)
    }
}

// ============================================================================
// Search
// ============================================================================

/// Documents for files matching a search query
#[derive(Debug, Clone)]
pub struct BoxFileSearchTool {
    api: Arc<BoxApiWrapper>,
}

impl BoxFileSearchTool {
    /// Validate the credentials in `config` and build the tool
    pub fn new(config: &BoxConfig) -> Result<Self> {
        Ok(Self::with_api(Arc::new(BoxApiWrapper::from_config(config)?)))
    }

    /// Build the tool over an existing wrapper
    pub fn with_api(api: Arc<BoxApiWrapper>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for BoxFileSearchTool {
    fn name(&self) -> &str {
        "box_file_search"
    }

    fn description(&self) -> &str {
        "Search Box for documents and return their text. Set query to the search terms."
    }

    fn query_description(&self) -> &str {
        "Search terms"
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let query = query_param(&params)?;
        let docs = self.api.get_documents_by_search(query).await?;
        Ok(serde_json::to_value(docs)?)
    }
}

// ============================================================================
// Folder contents
// ============================================================================

/// Documents for the files in a folder
#[derive(Debug, Clone)]
pub struct BoxFolderContentsTool {
    api: Arc<BoxApiWrapper>,
}

impl BoxFolderContentsTool {
    /// Validate the credentials in `config` and build the tool
    pub fn new(config: &BoxConfig) -> Result<Self> {
        Ok(Self::with_api(Arc::new(BoxApiWrapper::from_config(config)?)))
    }

    /// Build the tool over an existing wrapper
    pub fn with_api(api: Arc<BoxApiWrapper>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Tool for BoxFolderContentsTool {
    fn name(&self) -> &str {
        "box_folder_contents"
    }

    fn description(&self) -> &str {
        "Read every file in a Box folder. Set query to the folder id; '0' is the root folder."
    }

    fn query_description(&self) -> &str {
        "Box folder id, e.g. '1169680553945'. Do not include any other text."
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let folder_id = query_param(&params)?;
        let docs = self.api.get_documents_by_folder_id(folder_id, false).await?;
        Ok(serde_json::to_value(docs)?)
    }
}

// ============================================================================
// Box AI
// ============================================================================

/// Ask Box AI a question about a fixed set of files
#[derive(Debug, Clone)]
pub struct BoxAiAskTool {
    api: Arc<BoxApiWrapper>,
    file_ids: Vec<String>,
}

impl BoxAiAskTool {
    /// Requires `box_file_ids`; the prompt comes from each call
    pub fn new(config: &BoxConfig) -> Result<Self> {
        let api = Arc::new(BoxApiWrapper::from_config(config)?);
        Self::with_api(api, config.file_ids().unwrap_or_default())
    }

    /// Build the tool over an existing wrapper
    pub fn with_api(api: Arc<BoxApiWrapper>, file_ids: Vec<String>) -> Result<Self> {
        if file_ids.is_empty() {
            return Err(Error::config("Box AI requires box_file_ids"));
        }
        Ok(Self { api, file_ids })
    }

    /// Files every question is asked about
    pub fn file_ids(&self) -> &[String] {
        &self.file_ids
    }
}

#[async_trait]
impl Tool for BoxAiAskTool {
    fn name(&self) -> &str {
        "box_ai_ask_tool"
    }

    fn description(&self) -> &str {
        "Ask Box AI a question about one or more documents. Set query to the question."
    }

    fn query_description(&self) -> &str {
        "Box AI prompt"
    }

    async fn execute(&self, params: Value) -> Result<Value> {
        let prompt = query_param(&params)?;
        let doc = self.api.ask_ai(prompt, &self.file_ids).await?;
        Ok(serde_json::to_value(doc)?)
    }
}
