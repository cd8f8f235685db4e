//! Box loader implementations

use super::DocumentLoader;
use crate::api::BoxApiWrapper;
use crate::config::{required, BoxConfig};
use crate::error::{Error, Result};
use crate::query::QueryDescriptor;
use crate::types::{JsonObject, OptionStringExt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

/// Validated configuration plus the wrapper built from it
#[derive(Debug)]
struct LoaderCore {
    config: BoxConfig,
    api: BoxApiWrapper,
}

impl LoaderCore {
    fn new(config: BoxConfig) -> Result<Self> {
        let api = BoxApiWrapper::from_config(&config)?;
        Ok(Self { config, api })
    }
}

fn required_file_ids(config: &BoxConfig) -> Result<Vec<String>> {
    config
        .file_ids()
        .ok_or_else(|| Error::missing_field("box_file_ids"))
}

// ============================================================================
// Files
// ============================================================================

/// Loads specific files by id
#[derive(Debug)]
pub struct BoxFileLoader {
    core: LoaderCore,
    file_ids: Vec<String>,
}

impl BoxFileLoader {
    /// Requires `box_file_ids`
    pub fn new(config: BoxConfig) -> Result<Self> {
        let file_ids = required_file_ids(&config)?;
        let core = LoaderCore::new(config)?;
        debug!("File loader over {} files", file_ids.len());
        Ok(Self { core, file_ids })
    }

    /// Configuration this loader was built from
    pub fn config(&self) -> &BoxConfig {
        &self.core.config
    }
}

impl DocumentLoader for BoxFileLoader {
    fn api(&self) -> &BoxApiWrapper {
        &self.core.api
    }

    fn query(&self) -> QueryDescriptor {
        QueryDescriptor::FileIds {
            ids: self.file_ids.clone(),
        }
    }
}

// ============================================================================
// Folders
// ============================================================================

/// Loads the files of a folder
#[derive(Debug)]
pub struct BoxFolderLoader {
    core: LoaderCore,
    folder_id: String,
    recursive: bool,
}

impl BoxFolderLoader {
    /// Requires `box_folder_id`
    pub fn new(config: BoxConfig) -> Result<Self> {
        let folder_id = required(&config.box_folder_id, "box_folder_id")?;
        let core = LoaderCore::new(config)?;
        Ok(Self {
            core,
            folder_id,
            recursive: false,
        })
    }

    /// Also load files from sub-folders
    #[must_use]
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Configuration this loader was built from
    pub fn config(&self) -> &BoxConfig {
        &self.core.config
    }
}

impl DocumentLoader for BoxFolderLoader {
    fn api(&self) -> &BoxApiWrapper {
        &self.core.api
    }

    fn query(&self) -> QueryDescriptor {
        QueryDescriptor::Folder {
            id: self.folder_id.clone(),
            recursive: self.recursive,
        }
    }
}

// ============================================================================
// Search
// ============================================================================

/// Loads files matching a full-text search
#[derive(Debug)]
pub struct BoxSearchLoader {
    core: LoaderCore,
    query: String,
}

impl BoxSearchLoader {
    /// Requires `box_search_query`
    pub fn new(config: BoxConfig) -> Result<Self> {
        let query = required(&config.box_search_query, "box_search_query")?;
        let core = LoaderCore::new(config)?;
        Ok(Self { core, query })
    }

    /// Configuration this loader was built from
    pub fn config(&self) -> &BoxConfig {
        &self.core.config
    }
}

impl DocumentLoader for BoxSearchLoader {
    fn api(&self) -> &BoxApiWrapper {
        &self.core.api
    }

    fn query(&self) -> QueryDescriptor {
        QueryDescriptor::Search {
            query: self.query.clone(),
        }
    }
}

// ============================================================================
// Metadata queries
// ============================================================================

/// Loads files matching a metadata query
#[derive(Debug)]
pub struct BoxMetadataQueryLoader {
    core: LoaderCore,
    query: String,
    template: String,
    params: JsonObject,
    enterprise_id: String,
}

impl BoxMetadataQueryLoader {
    /// Requires `box_metadata_query`, `box_metadata_template`,
    /// `box_metadata_params` (a JSON object) and `box_enterprise_id`
    pub fn new(config: BoxConfig) -> Result<Self> {
        let query = required(&config.box_metadata_query, "box_metadata_query")?;
        let template = required(&config.box_metadata_template, "box_metadata_template")?;
        let params = config.metadata_params()?;
        let enterprise_id = required(&config.box_enterprise_id, "box_enterprise_id")?;
        let core = LoaderCore::new(config)?;
        Ok(Self {
            core,
            query,
            template,
            params,
            enterprise_id,
        })
    }

    /// Configuration this loader was built from
    pub fn config(&self) -> &BoxConfig {
        &self.core.config
    }
}

impl DocumentLoader for BoxMetadataQueryLoader {
    fn api(&self) -> &BoxApiWrapper {
        &self.core.api
    }

    fn query(&self) -> QueryDescriptor {
        QueryDescriptor::MetadataQuery {
            query: self.query.clone(),
            template: self.template.clone(),
            params: self.params.clone(),
            enterprise_id: self.enterprise_id.clone(),
        }
    }
}

// ============================================================================
// Box AI
// ============================================================================

/// Box AI endpoint a [`BoxAiLoader`] calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxAiMode {
    /// Ask a question about the files
    #[default]
    Ask,
}

impl fmt::Display for BoxAiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoxAiMode::Ask => write!(f, "ask"),
        }
    }
}

impl FromStr for BoxAiMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ask" => Ok(BoxAiMode::Ask),
            other => Err(Error::invalid_value(
                "mode",
                format!("unknown Box AI mode '{other}'"),
            )),
        }
    }
}

/// Loads a Box AI answer as a single document
#[derive(Debug)]
pub struct BoxAiLoader {
    core: LoaderCore,
    mode: BoxAiMode,
    prompt: String,
    file_ids: Vec<String>,
}

impl BoxAiLoader {
    /// Requires `box_ai_prompt` and `box_file_ids`
    pub fn new(mode: BoxAiMode, config: BoxConfig) -> Result<Self> {
        let prompt = config.box_ai_prompt.clone().none_if_empty();
        let file_ids = config.file_ids();
        let (Some(prompt), Some(file_ids)) = (prompt, file_ids) else {
            return Err(Error::config(
                "You must provide box_ai_prompt and box_file_ids",
            ));
        };
        let core = LoaderCore::new(config)?;
        Ok(Self {
            core,
            mode,
            prompt,
            file_ids,
        })
    }

    /// Box AI endpoint in use
    pub fn mode(&self) -> BoxAiMode {
        self.mode
    }

    /// Configuration this loader was built from
    pub fn config(&self) -> &BoxConfig {
        &self.core.config
    }
}

impl DocumentLoader for BoxAiLoader {
    fn api(&self) -> &BoxApiWrapper {
        &self.core.api
    }

    fn query(&self) -> QueryDescriptor {
        match self.mode {
            BoxAiMode::Ask => QueryDescriptor::AiAsk {
                prompt: self.prompt.clone(),
                file_ids: self.file_ids.clone(),
            },
        }
    }
}
