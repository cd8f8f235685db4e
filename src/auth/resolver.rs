//! Credential resolution
//!
//! Turns validated [`Credentials`] into an authenticated [`BoxClient`].
//! CCG and JWT perform one token exchange up front so bad credentials fail
//! here rather than on the first content call.

use super::types::{AuthConfig, Credentials, JwtAppConfig, Subject};
use crate::config::ClientSettings;
use crate::error::{Result, ResultExt};
use crate::http::HttpClient;
use crate::types::AuthType;
use tracing::{debug, info};

/// An authenticated handle on the Box API
#[derive(Debug)]
pub struct BoxClient {
    http: HttpClient,
    auth_type: AuthType,
}

impl BoxClient {
    /// HTTP client with authentication attached
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Auth flow this client was resolved with
    pub fn auth_type(&self) -> AuthType {
        self.auth_type
    }
}

/// Produces authenticated clients from credentials
#[derive(Debug, Clone)]
pub struct CredentialResolver {
    settings: ClientSettings,
}

impl CredentialResolver {
    /// Create a resolver that builds clients with `settings`
    pub fn new(settings: ClientSettings) -> Self {
        Self { settings }
    }

    /// Build the runtime auth config for `credentials`.
    ///
    /// Reads the JWT app config from disk; no network access.
    pub fn auth_config(&self, credentials: &Credentials) -> Result<AuthConfig> {
        match credentials {
            Credentials::Token { token } => Ok(AuthConfig::DeveloperToken {
                token: token.clone(),
            }),

            Credentials::Ccg {
                client_id,
                client_secret,
                subject,
            } => Ok(AuthConfig::ClientCredentials {
                token_url: self.settings.token_url.clone(),
                client_id: client_id.clone(),
                client_secret: client_secret.clone(),
                subject: subject.clone(),
            }),

            Credentials::Jwt {
                config_path,
                user_id,
            } => {
                let app = JwtAppConfig::from_file(config_path)?;
                let subject: Subject = app.subject(user_id.as_deref())?;
                Ok(AuthConfig::Jwt {
                    token_url: self.settings.token_url.clone(),
                    app,
                    subject,
                })
            }
        }
    }

    /// Resolve `credentials` into an authenticated client.
    ///
    /// Fails with a configuration error when the JWT config is unusable,
    /// with an authentication error when Box rejects the credentials and
    /// with an upstream error when the token endpoint cannot be reached.
    pub async fn resolve(&self, credentials: &Credentials) -> Result<BoxClient> {
        let auth_type = credentials.auth_type();
        debug!("Resolving Box client using {} auth", auth_type);

        let auth_config = self.auth_config(credentials)?;
        let needs_exchange = auth_config.needs_exchange();
        let http = HttpClient::with_auth(self.settings.http_config(), auth_config)?;

        if needs_exchange {
            if let Some(auth) = http.authenticator() {
                auth.access_token()
                    .await
                    .api_context(&format!("getting client from {auth_type} token"))?;
            }
        }

        info!("Box client ready ({} auth)", auth_type);
        Ok(BoxClient { http, auth_type })
    }
}
