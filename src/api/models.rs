//! Box API response models
//!
//! Only the fields the wrapper reads are modelled; everything else in a
//! response is ignored.

use crate::types::{AiMode, ItemType};
use serde::{Deserialize, Serialize};

// ============================================================================
// Files and representations
// ============================================================================

/// `GET /files/{id}?fields=name,representations,type`
#[derive(Debug, Clone, Deserialize)]
pub struct FileRepresentations {
    /// File name
    pub name: String,
    /// Representations Box has (or can generate) for this file
    #[serde(default)]
    pub representations: Option<RepresentationList>,
}

/// `representations` block of a file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepresentationList {
    /// Available representations
    #[serde(default)]
    pub entries: Vec<Representation>,
}

/// A single representation entry
#[derive(Debug, Clone, Deserialize)]
pub struct Representation {
    /// Representation kind, e.g. `extracted_text`
    pub representation: String,
    /// Generation status
    #[serde(default)]
    pub status: Option<RepresentationStatus>,
    /// Where to poll for the status
    #[serde(default)]
    pub info: Option<UrlRef>,
    /// Where to download from once ready
    #[serde(default)]
    pub content: Option<ContentTemplate>,
}

impl Representation {
    /// Generation state, `none` when Box did not report one
    pub fn state(&self) -> RepresentationState {
        self.status
            .as_ref()
            .map_or(RepresentationState::None, |s| RepresentationState::parse(&s.state))
    }
}

/// `status` of a representation
#[derive(Debug, Clone, Deserialize)]
pub struct RepresentationStatus {
    /// `success`, `viewable`, `pending`, `none` or `error`
    pub state: String,
}

/// Object with a `url`
#[derive(Debug, Clone, Deserialize)]
pub struct UrlRef {
    /// Absolute URL
    pub url: String,
}

/// `content` of a representation
#[derive(Debug, Clone, Deserialize)]
pub struct ContentTemplate {
    /// Download URL containing an `{+asset_path}` placeholder
    pub url_template: String,
}

/// Body of a representation `info.url`
#[derive(Debug, Clone, Deserialize)]
pub struct RepresentationInfo {
    /// Current generation status
    #[serde(default)]
    pub status: Option<RepresentationStatus>,
}

impl RepresentationInfo {
    /// Generation state, `none` when Box did not report one
    pub fn state(&self) -> RepresentationState {
        self.status
            .as_ref()
            .map_or(RepresentationState::None, |s| RepresentationState::parse(&s.state))
    }
}

/// Where Box is with generating a representation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepresentationState {
    /// Ready to download
    Success,
    /// Ready to download, possibly partial
    Viewable,
    /// Generation in progress
    Pending,
    /// Never generated
    None,
    /// Generation failed
    Error,
}

impl RepresentationState {
    fn parse(s: &str) -> Self {
        match s {
            "success" => Self::Success,
            "viewable" => Self::Viewable,
            "pending" => Self::Pending,
            "error" => Self::Error,
            _ => Self::None,
        }
    }

    /// Content can be downloaded
    pub fn is_ready(self) -> bool {
        matches!(self, Self::Success | Self::Viewable)
    }

    /// Box has to (finish) generating before content is available
    pub fn needs_generation(self) -> bool {
        matches!(self, Self::None | Self::Pending)
    }
}

/// Extracted text of a file and where it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextRepresentation {
    /// File name with `.` and spaces replaced by `_`
    pub file_name: String,
    /// Extracted text, truncated to the configured limit
    pub content: String,
    /// Content download URL
    pub url: String,
}

// ============================================================================
// Folders, search and metadata queries
// ============================================================================

/// An entry of a folder listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderEntry {
    /// Item id
    pub id: String,
    /// `file`, `folder` or `web_link`
    #[serde(rename = "type")]
    pub item_type: String,
    /// Item name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl FolderEntry {
    /// Parsed item type; `None` for types this crate does not know
    pub fn kind(&self) -> Option<ItemType> {
        ItemType::parse(&self.item_type)
    }
}

/// A search hit
#[derive(Debug, Clone, Deserialize)]
pub struct SearchEntry {
    /// Item id
    pub id: String,
    /// `file`, `folder` or `web_link`
    #[serde(rename = "type")]
    pub item_type: String,
    /// File extension, absent for folders
    #[serde(default)]
    pub extension: Option<String>,
}

/// A metadata query match
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataQueryEntry {
    /// Item id
    pub id: String,
    /// Item type, when the query returned one
    #[serde(rename = "type", default)]
    pub item_type: Option<String>,
}

// ============================================================================
// Box AI and users
// ============================================================================

/// `POST /ai/ask` request body
#[derive(Debug, Clone, Serialize)]
pub struct AiAskRequest {
    /// Single or multiple item question
    pub mode: AiMode,
    /// The question
    pub prompt: String,
    /// Files the question is about
    pub items: Vec<AiItem>,
}

/// Item reference in an AI request
#[derive(Debug, Clone, Serialize)]
pub struct AiItem {
    /// Item id
    pub id: String,
    /// Always `file`
    #[serde(rename = "type")]
    pub item_type: &'static str,
}

impl AiItem {
    /// Reference a file
    pub fn file(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            item_type: ItemType::File.as_str(),
        }
    }
}

/// `POST /ai/ask` response
#[derive(Debug, Clone, Deserialize)]
pub struct AiResponse {
    /// Generated answer
    pub answer: String,
}

/// `GET /users/me`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User id
    pub id: String,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Login email
    #[serde(default)]
    pub login: Option<String>,
}
