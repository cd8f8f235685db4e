//! Tool bundle for a configuration

use super::{BoxAiAskTool, BoxFileSearchTool, BoxFolderContentsTool, BoxTextRepTool, Tool};
use crate::api::BoxApiWrapper;
use crate::config::BoxConfig;
use crate::error::{Error, Result};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

/// All Box tools available for one configuration.
///
/// The tools share a single wrapper, so credentials are exchanged once.
/// `box_ai_ask_tool` is only included when `box_file_ids` is configured.
pub struct BoxToolkit {
    api: Arc<BoxApiWrapper>,
    tools: Vec<Arc<dyn Tool>>,
}

impl BoxToolkit {
    /// Validate the credentials in `config` and build the tools
    pub fn new(config: &BoxConfig) -> Result<Self> {
        let api = Arc::new(BoxApiWrapper::from_config(config)?);

        let mut tools: Vec<Arc<dyn Tool>> = vec![
            Arc::new(BoxTextRepTool::with_api(Arc::clone(&api))),
            Arc::new(BoxFileSearchTool::with_api(Arc::clone(&api))),
            Arc::new(BoxFolderContentsTool::with_api(Arc::clone(&api))),
        ];
        if let Some(file_ids) = config.file_ids() {
            tools.push(Arc::new(BoxAiAskTool::with_api(Arc::clone(&api), file_ids)?));
        }

        debug!("Box toolkit with {} tools", tools.len());
        Ok(Self { api, tools })
    }

    /// The shared wrapper
    pub fn api(&self) -> &Arc<BoxApiWrapper> {
        &self.api
    }

    /// Every tool in the kit
    pub fn tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    /// Tool names, in registration order
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Look up a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name).cloned()
    }

    /// `{name, description, parameters}` for every tool
    pub fn definitions(&self) -> Value {
        Value::Array(
            self.tools
                .iter()
                .map(|t| {
                    json!({
                        "name": t.name(),
                        "description": t.description(),
                        "parameters": t.parameters_schema(),
                    })
                })
                .collect(),
        )
    }

    /// Run the tool called `name`
    pub async fn execute(&self, name: &str, params: Value) -> Result<Value> {
        let tool = self
            .get(name)
            .ok_or_else(|| Error::not_found(format!("no tool named '{name}'")))?;
        tool.execute(params).await
    }
}

impl std::fmt::Debug for BoxToolkit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxToolkit")
            .field("tools", &self.names())
            .finish_non_exhaustive()
    }
}
