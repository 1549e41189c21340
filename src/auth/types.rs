//! Auth configuration types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How requests are authorized against the API
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthConfig {
    /// Public access only
    #[default]
    None,

    /// Static API token created in the admin panel
    Token {
        /// The bearer token
        token: String,
    },

    /// User credentials exchanged for a JWT through the local login route
    Credentials {
        /// Username or email
        identifier: String,
        /// Password
        password: String,
    },
}

impl AuthConfig {
    /// Whether a login round trip is needed before the first request
    pub fn needs_login(&self) -> bool {
        matches!(self, AuthConfig::Credentials { .. })
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthConfig::None => f.write_str("None"),
            AuthConfig::Token { .. } => f.debug_struct("Token").finish_non_exhaustive(),
            AuthConfig::Credentials { identifier, .. } => f
                .debug_struct("Credentials")
                .field("identifier", identifier)
                .finish_non_exhaustive(),
        }
    }
}

/// Cached token with expiration
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The JWT
    pub token: String,
    /// When the token expires, if known
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// Create a new cached token
    pub fn new(token: String, expires_at: Option<DateTime<Utc>>) -> Self {
        Self { token, expires_at }
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
