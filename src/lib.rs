//! # Box Connector
//!
//! Loads documents out of Box for retrieval pipelines and exposes the same
//! lookups as agent tools.
//!
//! ## Features
//!
//! - **Three Auth Flows**: developer token, client credentials grant, JWT app config
//! - **Text Representations**: extracted text with on-demand generation and polling
//! - **Loaders**: by file ids, folder, full-text search, metadata query, Box AI
//! - **Agent Tools**: text lookup, search, folder contents, Box AI questions
//! - **Lazy Streams**: documents are produced one at a time as they are fetched
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use box_connector::{BoxConfig, BoxFolderLoader, DocumentLoader, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = BoxConfig {
//!         box_folder_id: Some("0".to_string()),
//!         ..BoxConfig::developer_token("...")
//!     };
//!
//!     let loader = BoxFolderLoader::new(config)?.recursive(true);
//!     for doc in loader.load().await? {
//!         println!("{}: {} chars", doc.title, doc.content.len());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │            Loaders (DocumentLoader)     Tools (Tool)          │
//! │   files  folder  search  metadata  ai    text  search  ...    │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │ QueryDescriptor
//! ┌──────────────────────────────┴───────────────────────────────┐
//! │                      BoxApiWrapper                            │
//! │   lazy client · text representations · listings · Box AI      │
//! └──────────┬──────────────────┬──────────────────┬─────────────┘
//!            │                  │                  │
//! ┌──────────┴──────┐ ┌─────────┴────────┐ ┌───────┴───────────┐
//! │      Auth       │ │       HTTP       │ │    Pagination     │
//! │ Token  CCG  JWT │ │ Retry Rate Limit │ │  Offset   Marker  │
//! └─────────────────┘ └──────────────────┘ └───────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Configuration
pub mod config;

/// Credentials, token exchange and client resolution
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Pagination strategies
pub mod pagination;

/// Document records
pub mod document;

/// What to retrieve
pub mod query;

/// Box content API wrapper
pub mod api;

/// Document loaders
pub mod loader;

/// Agent tools
pub mod tools;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, ErrorKind, Result};
pub use types::*;

pub use api::{BoxApiWrapper, CheckResult, TextRepresentation};
pub use auth::Credentials;
pub use config::{BoxConfig, ClientSettings};
pub use document::Document;
pub use loader::{
    BoxAiLoader, BoxAiMode, BoxFileLoader, BoxFolderLoader, BoxMetadataQueryLoader,
    BoxSearchLoader, DocumentLoader,
};
pub use query::QueryDescriptor;
pub use tools::{
    BoxAiAskTool, BoxFileSearchTool, BoxFolderContentsTool, BoxTextRepTool, BoxToolkit, Tool,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
