//! Common types used throughout the Box connector
//!
//! Small enums shared by the auth, API and loader layers, plus a few
//! utility aliases.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Auth Type
// ============================================================================

/// Which credential flow to use when talking to Box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    /// Developer token pasted from the developer console
    Token,
    /// Client credentials grant
    Ccg,
    /// JWT app config stored on disk
    Jwt,
}

impl AuthType {
    /// Wire name of the auth type
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthType::Token => "token",
            AuthType::Ccg => "ccg",
            AuthType::Jwt => "jwt",
        }
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthType {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "token" => Ok(AuthType::Token),
            "ccg" => Ok(AuthType::Ccg),
            "jwt" => Ok(AuthType::Jwt),
            other => Err(crate::Error::invalid_value(
                "auth_type",
                format!("{other} is not a valid auth_type. Value must be token, ccg, or jwt"),
            )),
        }
    }
}

// ============================================================================
// Subject Type
// ============================================================================

/// Who a CCG or JWT token is issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectType {
    /// The enterprise service account
    Enterprise,
    /// A managed or app user
    User,
}

impl SubjectType {
    /// Value sent as `box_subject_type` / `box_sub_type`
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectType::Enterprise => "enterprise",
            SubjectType::User => "user",
        }
    }
}

// ============================================================================
// Item Type
// ============================================================================

/// Type of an item returned by folder listings and search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// A file
    File,
    /// A folder
    Folder,
    /// A bookmark to an external URL
    WebLink,
}

impl ItemType {
    /// Parse the `type` field of a Box item; unknown types yield `None`
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "file" => Some(ItemType::File),
            "folder" => Some(ItemType::Folder),
            "web_link" => Some(ItemType::WebLink),
            _ => None,
        }
    }

    /// Wire name of this type
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::File => "file",
            ItemType::Folder => "folder",
            ItemType::WebLink => "web_link",
        }
    }
}

// ============================================================================
// Box AI Mode
// ============================================================================

/// Box AI ask mode, chosen from the number of items in the request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiMode {
    /// Question about one file
    SingleItemQa,
    /// Question across several files
    MultipleItemQa,
}

impl AiMode {
    /// Pick the mode for a request over `item_count` files.
    ///
    /// Returns `None` when there are no items to ask about.
    pub fn for_item_count(item_count: usize) -> Option<Self> {
        match item_count {
            0 => None,
            1 => Some(AiMode::SingleItemQa),
            _ => Some(AiMode::MultipleItemQa),
        }
    }
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty or only whitespace
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.trim().is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.trim().is_empty() {
            None
        } else {
            Some(self)
        }
    }
}
