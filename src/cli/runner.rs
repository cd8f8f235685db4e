//! CLI runner - executes commands

use crate::api::BoxApiWrapper;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::BoxConfig;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::loader::{
    BoxAiLoader, BoxAiMode, BoxFileLoader, BoxFolderLoader, BoxMetadataQueryLoader,
    BoxSearchLoader, DocumentLoader,
};
use crate::tools::BoxToolkit;
use futures::StreamExt;
use serde_json::{json, Value};
use std::fs;
use std::time::Instant;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;

        match &self.cli.command {
            Commands::Check => self.check(&config).await,
            Commands::Files { ids } => {
                let mut config = config;
                if !ids.is_empty() {
                    config.box_file_ids = Some(ids.clone());
                }
                self.emit_documents(&BoxFileLoader::new(config)?).await
            }
            Commands::Folder { id, recursive } => {
                let mut config = config;
                override_field(&mut config.box_folder_id, id);
                let loader = BoxFolderLoader::new(config)?.recursive(*recursive);
                self.emit_documents(&loader).await
            }
            Commands::Search { query } => {
                let mut config = config;
                override_field(&mut config.box_search_query, query);
                self.emit_documents(&BoxSearchLoader::new(config)?).await
            }
            Commands::MetadataQuery {
                query,
                template,
                params,
                enterprise_id,
            } => {
                let mut config = config;
                override_field(&mut config.box_metadata_query, query);
                override_field(&mut config.box_metadata_template, template);
                override_field(&mut config.box_metadata_params, params);
                override_field(&mut config.box_enterprise_id, enterprise_id);
                self.emit_documents(&BoxMetadataQueryLoader::new(config)?)
                    .await
            }
            Commands::Ask { prompt, ids } => {
                let mut config = config;
                override_field(&mut config.box_ai_prompt, prompt);
                if !ids.is_empty() {
                    config.box_file_ids = Some(ids.clone());
                }
                self.emit_documents(&BoxAiLoader::new(BoxAiMode::Ask, config)?)
                    .await
            }
            Commands::TextRep { id } => {
                let mut config = config;
                override_field(&mut config.box_file_id, id);
                self.text_rep(&config).await
            }
            Commands::Tools => self.list_tools(&config),
            Commands::Tool { name, query } => self.run_tool(&config, name, query).await,
        }
    }

    /// Build the effective configuration.
    ///
    /// Inline JSON wins over the config file; secrets missing from both are
    /// read from the environment; global flags override last.
    fn load_config(&self) -> Result<BoxConfig> {
        let config = if let Some(json_str) = &self.cli.config_json {
            BoxConfig::from_json_str(json_str)
                .map_err(|e| Error::config(format!("Invalid config JSON: {e}")))?
        } else if let Some(path) = &self.cli.config {
            BoxConfig::from_file(path)?
        } else {
            BoxConfig::default()
        };

        let mut config = config.with_env_fallback();
        if let Some(auth_type) = self.cli.auth_type {
            config.auth_type = Some(auth_type);
        }
        if let Some(max_items) = self.cli.max_items {
            config.client.max_items = Some(max_items);
        }
        Ok(config)
    }

    /// Check connection
    async fn check(&self, config: &BoxConfig) -> Result<()> {
        let api = BoxApiWrapper::from_config(config)?;
        self.log("INFO", format!("Checking connection to {}", api.settings().api_base_url));

        let result = api.check().await?;
        let status = if result.success { "SUCCEEDED" } else { "FAILED" };
        self.output_message(&json!({
            "type": "CONNECTION_STATUS",
            "connectionStatus": {
                "status": status,
                "message": result.message,
                "user": result.user,
            }
        }));
        Ok(())
    }

    /// Stream every document a loader yields, one message each
    async fn emit_documents(&self, loader: &dyn DocumentLoader) -> Result<()> {
        let started = Instant::now();
        let label = loader.query().label();
        debug!("Loading documents for {}", label);

        let mut stream = loader.lazy_load();
        let mut count = 0usize;
        while let Some(doc) = stream.next().await {
            self.output_document(&doc?);
            count += 1;
        }

        self.log(
            "INFO",
            format!(
                "Loaded {count} documents for {label} in {:.1}s",
                started.elapsed().as_secs_f64()
            ),
        );
        Ok(())
    }

    /// Print one file's text representation
    async fn text_rep(&self, config: &BoxConfig) -> Result<()> {
        let file_id = crate::config::required(&config.box_file_id, "box_file_id")?;
        let api = BoxApiWrapper::from_config(config)?;

        match api.get_text_representation(&file_id).await? {
            Some(rep) => self.output_message(&json!({
                "type": "TEXT_REPRESENTATION",
                "textRepresentation": rep,
            })),
            None => self.log("WARN", format!("File {file_id} has no text representation")),
        }
        Ok(())
    }

    /// Print the tool definitions
    fn list_tools(&self, config: &BoxConfig) -> Result<()> {
        let kit = BoxToolkit::new(config)?;
        self.output_message(&json!({
            "type": "TOOLS",
            "tools": kit.definitions(),
        }));
        Ok(())
    }

    /// Run a tool and print its result
    async fn run_tool(&self, config: &BoxConfig, name: &str, query: &str) -> Result<()> {
        let kit = BoxToolkit::new(config)?;
        let result = kit.execute(name, json!({ "query": query })).await?;
        self.output_message(&json!({
            "type": "TOOL_RESULT",
            "tool": name,
            "result": result,
        }));
        Ok(())
    }

    fn output_document(&self, doc: &Document) {
        self.output_message(&json!({
            "type": "DOCUMENT",
            "document": doc,
        }));
    }

    /// Log lines only appear with --verbose
    fn log(&self, level: &str, message: String) {
        if self.cli.verbose {
            self.output_message(&json!({
                "type": "LOG",
                "log": {
                    "level": level,
                    "message": message
                }
            }));
        }
    }

    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Replace `slot` with a non-empty CLI value
fn override_field(slot: &mut Option<String>, value: &Option<String>) {
    if let Some(v) = value.as_ref().filter(|v| !v.trim().is_empty()) {
        *slot = Some(v.clone());
    }
}
