//! Auth configuration types
//!
//! [`Credentials`] is what a user configures; [`AuthConfig`] is the runtime
//! form the [`Authenticator`](super::Authenticator) works from, after any
//! JWT app config has been read from disk.

use crate::config::{required, BoxConfig};
use crate::error::{Error, Result};
use crate::types::{AuthType, OptionStringExt, SubjectType};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ============================================================================
// Credentials
// ============================================================================

/// The identity a CCG or JWT token is issued for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    /// Enterprise or user
    pub subject_type: SubjectType,
    /// Enterprise id or user id
    pub id: String,
}

impl Subject {
    /// An enterprise service-account subject
    pub fn enterprise(id: impl Into<String>) -> Self {
        Self {
            subject_type: SubjectType::Enterprise,
            id: id.into(),
        }
    }

    /// A user subject
    pub fn user(id: impl Into<String>) -> Self {
        Self {
            subject_type: SubjectType::User,
            id: id.into(),
        }
    }
}

/// Validated credentials for one of the three Box auth flows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Developer token
    Token {
        /// The token itself
        token: String,
    },

    /// Client credentials grant
    Ccg {
        /// App client id
        client_id: String,
        /// App client secret
        client_secret: String,
        /// User when configured, otherwise the enterprise
        subject: Subject,
    },

    /// JWT app config on the local file system
    Jwt {
        /// Path to the app config JSON
        config_path: PathBuf,
        /// Act as this user instead of the enterprise service account
        user_id: Option<String>,
    },
}

impl Credentials {
    /// Validate the auth fields of `config` for its auth type.
    ///
    /// Only the selected variant's fields are inspected; anything else in
    /// the config is ignored.
    pub fn from_config(config: &BoxConfig) -> Result<Self> {
        match config.auth_type()? {
            AuthType::Token => Ok(Credentials::Token {
                token: required(&config.box_developer_token, "box_developer_token")?,
            }),

            AuthType::Ccg => {
                let client_id = config.box_client_id.clone().none_if_empty();
                let client_secret = config.box_client_secret.clone().none_if_empty();
                let user_id = config.box_user_id.clone().none_if_empty();
                let enterprise_id = config.box_enterprise_id.clone().none_if_empty();

                let subject = match (user_id, enterprise_id) {
                    (Some(user), _) => Some(Subject::user(user)),
                    (None, Some(enterprise)) => Some(Subject::enterprise(enterprise)),
                    (None, None) => None,
                };

                match (client_id, client_secret, subject) {
                    (Some(client_id), Some(client_secret), Some(subject)) => Ok(Credentials::Ccg {
                        client_id,
                        client_secret,
                        subject,
                    }),
                    _ => Err(Error::config(
                        "ccg requires box_client_id, box_client_secret, and either \
                         box_enterprise_id or box_user_id",
                    )),
                }
            }

            AuthType::Jwt => Ok(Credentials::Jwt {
                config_path: PathBuf::from(required(&config.box_jwt_path, "box_jwt_path")?),
                user_id: config.box_user_id.clone().none_if_empty(),
            }),
        }
    }

    /// Auth type of these credentials
    pub fn auth_type(&self) -> AuthType {
        match self {
            Credentials::Token { .. } => AuthType::Token,
            Credentials::Ccg { .. } => AuthType::Ccg,
            Credentials::Jwt { .. } => AuthType::Jwt,
        }
    }
}

// ============================================================================
// JWT App Config
// ============================================================================

/// The app config JSON downloaded from the Box developer console
#[derive(Debug, Clone, Deserialize)]
pub struct JwtAppConfig {
    /// App settings block
    #[serde(rename = "boxAppSettings")]
    pub app_settings: BoxAppSettings,
    /// Enterprise the app is installed in
    #[serde(rename = "enterpriseID", default)]
    pub enterprise_id: Option<String>,
}

/// `boxAppSettings` section of the app config
#[derive(Debug, Clone, Deserialize)]
pub struct BoxAppSettings {
    /// App client id
    #[serde(rename = "clientID")]
    pub client_id: String,
    /// App client secret
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
    /// Key pair used to sign assertions
    #[serde(rename = "appAuth")]
    pub app_auth: AppAuth,
}

/// `appAuth` section of the app config
#[derive(Debug, Clone, Deserialize)]
pub struct AppAuth {
    /// Id of the public key registered with Box, sent as `kid`
    #[serde(rename = "publicKeyID")]
    pub public_key_id: String,
    /// PEM private key
    #[serde(rename = "privateKey")]
    pub private_key: String,
    /// Passphrase of an encrypted key
    #[serde(default)]
    pub passphrase: Option<String>,
}

impl JwtAppConfig {
    /// Parse an app config from JSON
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::invalid_value("box_jwt_path", format!("invalid JWT config: {e}")))
    }

    /// Read and parse an app config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::invalid_value(
                "box_jwt_path",
                format!("cannot read JWT config {}: {e}", path.display()),
            )
        })?;
        Self::from_json_str(&content)
    }

    /// Token subject: the user when given, otherwise the app's enterprise
    pub fn subject(&self, user_id: Option<&str>) -> Result<Subject> {
        if let Some(user) = user_id {
            return Ok(Subject::user(user));
        }
        self.enterprise_id
            .clone()
            .none_if_empty()
            .map(Subject::enterprise)
            .ok_or_else(|| {
                Error::invalid_value(
                    "box_jwt_path",
                    "JWT config has no enterpriseID and no box_user_id was given",
                )
            })
    }
}

// ============================================================================
// Runtime Auth Config
// ============================================================================

/// Authentication configuration the authenticator runs with
#[derive(Debug, Clone)]
pub enum AuthConfig {
    /// Static developer token, sent as-is
    DeveloperToken {
        /// The bearer token
        token: String,
    },

    /// Client credentials grant against the token endpoint
    ClientCredentials {
        /// Token endpoint URL
        token_url: String,
        /// Client ID
        client_id: String,
        /// Client secret
        client_secret: String,
        /// Token subject
        subject: Subject,
    },

    /// Signed JWT assertion exchanged at the token endpoint
    Jwt {
        /// Token endpoint URL (also the `aud` claim)
        token_url: String,
        /// Parsed app config
        app: JwtAppConfig,
        /// Token subject
        subject: Subject,
    },
}

impl AuthConfig {
    /// Whether getting a token requires a round trip to the token endpoint
    pub fn needs_exchange(&self) -> bool {
        !matches!(self, AuthConfig::DeveloperToken { .. })
    }
}

// ============================================================================
// Cached Token
// ============================================================================

/// Cached token with expiration
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The access token
    pub token: String,
    /// When the token expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Create a new cached token
    pub fn new(token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { token, expires_at }
    }

    /// Create a token that expires in N seconds from now
    pub fn expires_in(token: String, seconds: i64) -> Self {
        let expires_at = Utc::now() + chrono::Duration::seconds(seconds);
        Self {
            token,
            expires_at: Some(expires_at),
        }
    }

    /// Check if the token is expired (with 30 second buffer)
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => {
                let buffer = chrono::Duration::seconds(30);
                Utc::now() + buffer >= expires_at
            }
            None => false,
        }
    }
}
