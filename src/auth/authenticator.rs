//! Authenticator implementation
//!
//! Handles applying the bearer token to requests and managing token
//! exchange and refresh for the CCG and JWT flows.

use super::types::{AuthConfig, CachedToken, JwtAppConfig, Subject};
use crate::error::{Error, Result};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Box rejects assertions that expire more than 60 seconds out
const ASSERTION_LIFETIME_SECS: i64 = 45;

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Authenticator handles applying authentication to HTTP requests
pub struct Authenticator {
    /// Auth configuration
    config: AuthConfig,
    /// Cached token for CCG/JWT auth
    cached_token: Arc<RwLock<Option<CachedToken>>>,
    /// HTTP client for token requests
    http_client: Client,
}

impl Authenticator {
    /// Create a new authenticator with the given config
    pub fn new(config: AuthConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    /// Create an authenticator with a custom HTTP client
    pub fn with_client(config: AuthConfig, http_client: Client) -> Self {
        Self {
            config,
            cached_token: Arc::new(RwLock::new(None)),
            http_client,
        }
    }

    /// Apply authentication to a request builder
    pub async fn apply(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.access_token().await?;
        Ok(req.bearer_auth(token))
    }

    /// Current access token, exchanging or refreshing it when needed
    pub async fn access_token(&self) -> Result<String> {
        match &self.config {
            AuthConfig::DeveloperToken { token } => Ok(token.clone()),
            AuthConfig::ClientCredentials { .. } | AuthConfig::Jwt { .. } => {
                self.get_or_refresh_token().await
            }
        }
    }

    /// Get a valid token, refreshing if necessary
    async fn get_or_refresh_token(&self) -> Result<String> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if !token.is_expired() {
                    return Ok(token.token.clone());
                }
            }
        }

        let mut cached = self.cached_token.write().await;

        // Another task may have refreshed while we waited for the write lock
        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Ok(token.token.clone());
            }
        }

        let new_token = self.fetch_new_token().await?;
        let token_str = new_token.token.clone();
        *cached = Some(new_token);

        Ok(token_str)
    }

    /// Fetch a new token based on auth type
    async fn fetch_new_token(&self) -> Result<CachedToken> {
        match &self.config {
            AuthConfig::ClientCredentials {
                token_url,
                client_id,
                client_secret,
                subject,
            } => {
                debug!(
                    "Requesting CCG token for {} {}",
                    subject.subject_type.as_str(),
                    subject.id
                );
                let form = [
                    ("grant_type", "client_credentials".to_string()),
                    ("client_id", client_id.clone()),
                    ("client_secret", client_secret.clone()),
                    ("box_subject_type", subject.subject_type.as_str().to_string()),
                    ("box_subject_id", subject.id.clone()),
                ];
                self.request_token(token_url, &form).await
            }

            AuthConfig::Jwt {
                token_url,
                app,
                subject,
            } => {
                debug!(
                    "Requesting JWT token for {} {}",
                    subject.subject_type.as_str(),
                    subject.id
                );
                let assertion = build_assertion(app, subject, token_url)?;
                let form = [
                    ("grant_type", JWT_BEARER_GRANT.to_string()),
                    ("assertion", assertion),
                    ("client_id", app.app_settings.client_id.clone()),
                    ("client_secret", app.app_settings.client_secret.clone()),
                ];
                self.request_token(token_url, &form).await
            }

            AuthConfig::DeveloperToken { .. } => Err(Error::auth(
                "Token exchange not supported for developer tokens",
            )),
        }
    }

    /// POST a token request form and parse the response
    async fn request_token(&self, token_url: &str, form: &[(&str, String)]) -> Result<CachedToken> {
        let response = self
            .http_client
            .post(token_url)
            .form(form)
            .send()
            .await
            .map_err(Error::Http)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            let description = describe_token_error(&body);
            // Only these mean the credentials themselves were refused
            if matches!(status, 400 | 401 | 403) {
                return Err(Error::auth(format!(
                    "Token request failed with status {status}: {description}"
                )));
            }
            return Err(Error::http_status(status, description));
        }

        let token_response: TokenResponse = response.json().await.map_err(Error::Http)?;
        Ok(token_response.into_cached_token())
    }

    /// Clear the cached token (forces a new exchange on next use)
    pub async fn clear_cache(&self) {
        let mut cached = self.cached_token.write().await;
        *cached = None;
    }

    /// Get the current auth config
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.config {
            AuthConfig::DeveloperToken { .. } => "token",
            AuthConfig::ClientCredentials { .. } => "ccg",
            AuthConfig::Jwt { .. } => "jwt",
        };
        f.debug_struct("Authenticator")
            .field("kind", &kind)
            .finish_non_exhaustive()
    }
}

/// Sign the RS256 assertion Box expects for the JWT grant
pub(crate) fn build_assertion(app: &JwtAppConfig, subject: &Subject, audience: &str) -> Result<String> {
    let private_key = &app.app_settings.app_auth.private_key;
    if private_key.contains("ENCRYPTED") {
        return Err(Error::invalid_value(
            "box_jwt_path",
            "encrypted private keys are not supported; decrypt the key \
             (e.g. `openssl pkcs8 -topk8 -nocrypt`) and store it in privateKey",
        ));
    }

    let now = Utc::now().timestamp();
    let claims = JwtClaims {
        iss: app.app_settings.client_id.clone(),
        sub: subject.id.clone(),
        box_sub_type: subject.subject_type.as_str().to_string(),
        aud: audience.to_string(),
        jti: uuid::Uuid::new_v4().simple().to_string(),
        exp: now + ASSERTION_LIFETIME_SECS,
    };

    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(app.app_settings.app_auth.public_key_id.clone());

    let encoding_key = EncodingKey::from_rsa_pem(private_key.as_bytes())
        .map_err(|e| Error::invalid_value("box_jwt_path", format!("invalid private key: {e}")))?;

    encode(&header, &claims, &encoding_key).map_err(|e| Error::JwtGeneration {
        message: format!("Failed to encode JWT: {e}"),
    })
}

/// Pull `error_description` out of an OAuth2 error body when there is one
fn describe_token_error(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error_description")
                .or_else(|| v.get("error"))
                .and_then(Value::as_str)
                .map(String::from)
        })
        .unwrap_or_else(|| body.to_string())
}

/// OAuth2 token response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

impl TokenResponse {
    fn into_cached_token(self) -> CachedToken {
        match self.expires_in {
            Some(secs) => CachedToken::expires_in(self.access_token, secs),
            None => CachedToken::new(self.access_token, None),
        }
    }
}

/// Claims of the JWT grant assertion
#[derive(Debug, Serialize)]
struct JwtClaims {
    iss: String,
    sub: String,
    box_sub_type: String,
    aud: String,
    jti: String,
    exp: i64,
}
