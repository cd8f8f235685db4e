//! Box content API
//!
//! The [`BoxApiWrapper`] exposes every retrieval the loaders and tools are
//! built from: text representations, folder listings, search, metadata
//! queries and Box AI.

mod extensions;
mod models;
mod wrapper;

pub use extensions::{is_document_extension, DOCUMENT_EXTENSIONS};
pub use models::{
    CurrentUser, FolderEntry, Representation, RepresentationInfo, RepresentationState,
    TextRepresentation,
};
pub use wrapper::{BoxApiWrapper, CheckResult, SEARCH_MAX_OFFSET};

#[cfg(test)]
mod tests;
