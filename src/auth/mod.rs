//! Authentication module
//!
//! Supports the three Box flows: developer token, client credentials grant
//! (CCG) and JWT app config.
//!
//! [`Credentials`] validates what the user configured, the
//! [`CredentialResolver`] turns it into an authenticated [`BoxClient`], and
//! the [`Authenticator`] inside that client caches and refreshes access
//! tokens.

mod authenticator;
mod resolver;
mod types;

pub use authenticator::Authenticator;
pub use resolver::{BoxClient, CredentialResolver};
pub use types::{
    AppAuth, AuthConfig, BoxAppSettings, CachedToken, Credentials, JwtAppConfig, Subject,
};
