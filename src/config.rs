//! Configuration types
//!
//! [`BoxConfig`] is the user-facing configuration surface: an auth-mode tag
//! plus the optional credential and query fields every loader and tool draws
//! from. [`ClientSettings`] carries transport knobs (endpoints, timeouts,
//! paging, rate limits) with sensible defaults.
//!
//! Configs can be built in code, deserialized from YAML or JSON, and topped
//! up from environment variables for the secret fields.

use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::{AuthType, BackoffType, JsonObject, JsonValue, OptionStringExt};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment fallback for `box_developer_token`
pub const ENV_DEVELOPER_TOKEN: &str = "BOX_DEVELOPER_TOKEN";
/// Environment fallback for `box_client_id`
pub const ENV_CLIENT_ID: &str = "BOX_CLIENT_ID";
/// Environment fallback for `box_client_secret`
pub const ENV_CLIENT_SECRET: &str = "BOX_CLIENT_SECRET";
/// Environment fallback for `box_jwt_path`
pub const ENV_JWT_PATH: &str = "BOX_JWT_PATH";

// ============================================================================
// Box Config
// ============================================================================

/// Connection and query configuration for Box loaders and tools
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxConfig {
    /// Credential flow to use
    #[serde(default)]
    pub auth_type: Option<AuthType>,

    /// Developer token (token auth)
    #[serde(default)]
    pub box_developer_token: Option<String>,

    /// App client id (CCG)
    #[serde(default)]
    pub box_client_id: Option<String>,

    /// App client secret (CCG)
    #[serde(default)]
    pub box_client_secret: Option<String>,

    /// User to act as (CCG or JWT)
    #[serde(default)]
    pub box_user_id: Option<String>,

    /// Enterprise to act as (CCG), also used by metadata queries
    #[serde(default)]
    pub box_enterprise_id: Option<String>,

    /// Path to the JWT app config JSON (JWT)
    #[serde(default)]
    pub box_jwt_path: Option<String>,

    /// Single file id for text representation lookups
    #[serde(default)]
    pub box_file_id: Option<String>,

    /// File ids to load or ask Box AI about
    #[serde(default)]
    pub box_file_ids: Option<Vec<String>>,

    /// Folder to load
    #[serde(default)]
    pub box_folder_id: Option<String>,

    /// Free-text search query
    #[serde(default)]
    pub box_search_query: Option<String>,

    /// Metadata query `WHERE`-style expression
    #[serde(default)]
    pub box_metadata_query: Option<String>,

    /// Metadata template key
    #[serde(default)]
    pub box_metadata_template: Option<String>,

    /// JSON object with the metadata query parameters
    #[serde(default)]
    pub box_metadata_params: Option<String>,

    /// Prompt for Box AI
    #[serde(default)]
    pub box_ai_prompt: Option<String>,

    /// Transport settings
    #[serde(default)]
    pub client: ClientSettings,
}

impl BoxConfig {
    /// Create an empty config for the given auth type
    pub fn new(auth_type: AuthType) -> Self {
        Self {
            auth_type: Some(auth_type),
            ..Default::default()
        }
    }

    /// Create a token-auth config
    pub fn developer_token(token: impl Into<String>) -> Self {
        Self {
            auth_type: Some(AuthType::Token),
            box_developer_token: Some(token.into()),
            ..Default::default()
        }
    }

    /// Parse a config from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Parse a config from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a config file; `.json` is parsed as JSON, anything else as YAML
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Fill unset secret fields from the process environment
    #[must_use]
    pub fn with_env_fallback(self) -> Self {
        self.with_lookup(|key| std::env::var(key).ok())
    }

    /// Fill unset secret fields from `lookup`
    #[must_use]
    pub fn with_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        fill(&mut self.box_developer_token, ENV_DEVELOPER_TOKEN, &lookup);
        fill(&mut self.box_client_id, ENV_CLIENT_ID, &lookup);
        fill(&mut self.box_client_secret, ENV_CLIENT_SECRET, &lookup);
        fill(&mut self.box_jwt_path, ENV_JWT_PATH, &lookup);
        self
    }

    /// The configured auth type, or a configuration error
    pub fn auth_type(&self) -> Result<AuthType> {
        self.auth_type
            .ok_or_else(|| Error::config("Auth type must be set"))
    }

    /// Parse `box_metadata_params` into a JSON object
    pub fn metadata_params(&self) -> Result<JsonObject> {
        let raw = required(&self.box_metadata_params, "box_metadata_params")?;
        parse_metadata_params(&raw)
    }

    /// File ids with blanks removed, or `None` when nothing usable is set
    pub fn file_ids(&self) -> Option<Vec<String>> {
        let ids: Vec<String> = self
            .box_file_ids
            .iter()
            .flatten()
            .filter_map(|id| id.clone().none_if_empty())
            .collect();
        if ids.is_empty() {
            None
        } else {
            Some(ids)
        }
    }
}

fn fill<F>(slot: &mut Option<String>, key: &str, lookup: &F)
where
    F: Fn(&str) -> Option<String>,
{
    if slot.clone().none_if_empty().is_none() {
        if let Some(value) = lookup(key).none_if_empty() {
            *slot = Some(value);
        }
    }
}

/// Return a non-blank field value or a missing-field error
pub(crate) fn required(value: &Option<String>, field: &str) -> Result<String> {
    value
        .clone()
        .none_if_empty()
        .ok_or_else(|| Error::missing_field(field))
}

/// Parse a metadata params string, which must hold a JSON object
pub(crate) fn parse_metadata_params(raw: &str) -> Result<JsonObject> {
    match serde_json::from_str::<JsonValue>(raw) {
        Ok(JsonValue::Object(map)) => Ok(map),
        Ok(_) => Err(Error::invalid_value(
            "box_metadata_params",
            "must be a JSON object",
        )),
        Err(e) => Err(Error::invalid_value("box_metadata_params", e.to_string())),
    }
}

// ============================================================================
// Client Settings
// ============================================================================

/// Transport settings shared by every request a wrapper makes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// Base URL of the Box content API
    pub api_base_url: String,
    /// OAuth2 token endpoint (CCG and JWT)
    pub token_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Retries for 429/5xx/connect failures (0 disables retrying)
    pub max_retries: u32,
    /// Backoff strategy between retries
    pub backoff: BackoffType,
    /// First backoff delay in milliseconds
    pub initial_backoff_ms: u64,
    /// Client-side request rate; `None` disables the limiter
    pub requests_per_second: Option<u32>,
    /// Page size for folder listings, search and metadata queries
    pub page_size: u32,
    /// Stop paging after this many items; `None` follows every page
    pub max_items: Option<usize>,
    /// Maximum characters kept from a text representation
    pub text_limit: usize,
    /// Times to poll a representation that is still being generated
    pub representation_poll_attempts: u32,
    /// Delay between representation polls in milliseconds
    pub representation_poll_interval_ms: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.box.com/2.0".to_string(),
            token_url: "https://api.box.com/oauth2/token".to_string(),
            timeout_secs: 30,
            max_retries: 0,
            backoff: BackoffType::Exponential,
            initial_backoff_ms: 500,
            requests_per_second: Some(10),
            page_size: 100,
            max_items: None,
            text_limit: 10_000,
            representation_poll_attempts: 5,
            representation_poll_interval_ms: 1_000,
            user_agent: format!("box-connector/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientSettings {
    /// Point both the API and the token endpoint at `base` (used by tests
    /// and proxies)
    #[must_use]
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        let base = base.into();
        let base = base.trim_end_matches('/');
        self.api_base_url = format!("{base}/2.0");
        self.token_url = format!("{base}/oauth2/token");
        self
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Delay between representation polls
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.representation_poll_interval_ms)
    }

    /// Build the HTTP client configuration for these settings
    pub fn http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(&self.api_base_url)
            .timeout(self.timeout())
            .max_retries(self.max_retries)
            .backoff(
                self.backoff,
                Duration::from_millis(self.initial_backoff_ms),
                Duration::from_secs(60),
            )
            .header("x-box-ai-library", env!("CARGO_PKG_NAME"))
            .user_agent(&self.user_agent);

        builder = match self.requests_per_second {
            Some(rps) => builder.rate_limit(RateLimiterConfig::new(rps, rps)),
            None => builder.no_rate_limit(),
        };

        builder.build()
    }
}
