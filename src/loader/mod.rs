//! Document loaders
//!
//! Each loader validates a [`BoxConfig`](crate::config::BoxConfig) when it is
//! built and then performs exactly one retrieval:
//!
//! - [`BoxFileLoader`] - specific files by id
//! - [`BoxFolderLoader`] - the files of a folder, optionally recursive
//! - [`BoxSearchLoader`] - files matching a search query
//! - [`BoxMetadataQueryLoader`] - files matching a metadata query
//! - [`BoxAiLoader`] - a Box AI answer about a set of files
//!
//! Documents are produced lazily by [`DocumentLoader::lazy_load`];
//! [`DocumentLoader::load`] collects them.

mod loaders;

pub use loaders::{
    BoxAiLoader, BoxAiMode, BoxFileLoader, BoxFolderLoader, BoxMetadataQueryLoader,
    BoxSearchLoader,
};

use crate::api::BoxApiWrapper;
use crate::document::{Document, DocumentStream};
use crate::error::Result;
use crate::query::QueryDescriptor;
use async_trait::async_trait;
use futures::TryStreamExt;

/// A source of Box documents
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    /// Wrapper the loader reads through
    fn api(&self) -> &BoxApiWrapper;

    /// The retrieval this loader performs
    fn query(&self) -> QueryDescriptor;

    /// Stream documents; nothing is fetched until the stream is polled
    fn lazy_load(&self) -> DocumentStream<'_> {
        self.api().stream_documents(&self.query())
    }

    /// Fetch every document
    async fn load(&self) -> Result<Vec<Document>> {
        self.lazy_load().try_collect().await
    }
}
