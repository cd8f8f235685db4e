//! CLI commands and argument parsing

use crate::types::AuthType;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

/// Box document connector CLI
#[derive(Parser, Debug)]
#[command(name = "box-connector")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML, or JSON with a .json extension)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Inline config JSON (takes precedence over --config)
    #[arg(long, global = true)]
    pub config_json: Option<String>,

    /// Auth type override: token, ccg or jwt
    #[arg(long, global = true, value_parser = parse_auth_type)]
    pub auth_type: Option<AuthType>,

    /// Stop paging after this many items
    #[arg(long, global = true)]
    pub max_items: Option<usize>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Test the credentials against Box
    Check,

    /// Load specific files
    Files {
        /// File ids (comma-separated); defaults to box_file_ids
        #[arg(long, value_delimiter = ',')]
        ids: Vec<String>,
    },

    /// Load the files in a folder
    Folder {
        /// Folder id; defaults to box_folder_id
        #[arg(long)]
        id: Option<String>,

        /// Include files from sub-folders
        #[arg(long)]
        recursive: bool,
    },

    /// Load files matching a search query
    Search {
        /// Search query; defaults to box_search_query
        #[arg(long)]
        query: Option<String>,
    },

    /// Load files matching a metadata query
    MetadataQuery {
        /// Query expression; defaults to box_metadata_query
        #[arg(long)]
        query: Option<String>,

        /// Template key; defaults to box_metadata_template
        #[arg(long)]
        template: Option<String>,

        /// Query parameters as a JSON object; defaults to box_metadata_params
        #[arg(long)]
        params: Option<String>,

        /// Enterprise id; defaults to box_enterprise_id
        #[arg(long)]
        enterprise_id: Option<String>,
    },

    /// Ask Box AI about one or more files
    Ask {
        /// Prompt; defaults to box_ai_prompt
        #[arg(long)]
        prompt: Option<String>,

        /// File ids (comma-separated); defaults to box_file_ids
        #[arg(long, value_delimiter = ',')]
        ids: Vec<String>,
    },

    /// Print the text representation of one file
    TextRep {
        /// File id; defaults to box_file_id
        #[arg(long)]
        id: Option<String>,
    },

    /// List the agent tools available for this configuration
    Tools,

    /// Run one agent tool
    Tool {
        /// Tool name, e.g. box_file_search
        name: String,

        /// Value of the tool's query parameter
        #[arg(long)]
        query: String,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}

fn parse_auth_type(s: &str) -> Result<AuthType, String> {
    AuthType::from_str(s).map_err(|e| e.to_string())
}
