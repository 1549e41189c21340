//! Client configuration
//!
//! [`ClientConfig`] is loaded from YAML and/or the environment:
//!
//! ```yaml
//! base_url: https://cms.example.com
//! api_prefix: api
//! auth:
//!   type: token
//!   token: 0123abcd
//! timeout_secs: 30
//! batch_size: 25
//! default_headers:
//!   X-Tenant: acme
//! ```
//!
//! Environment variables override file values: `STRAPI_URL`, `STRAPI_TOKEN`,
//! `STRAPI_IDENTIFIER` + `STRAPI_PASSWORD`, `STRAPI_TIMEOUT_SECS`.

use crate::auth::AuthConfig;
use crate::error::{Error, Result};
use crate::types::OptionStringExt;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

pub const ENV_URL: &str = "STRAPI_URL";
pub const ENV_TOKEN: &str = "STRAPI_TOKEN";
pub const ENV_IDENTIFIER: &str = "STRAPI_IDENTIFIER";
pub const ENV_PASSWORD: &str = "STRAPI_PASSWORD";
pub const ENV_TIMEOUT_SECS: &str = "STRAPI_TIMEOUT_SECS";

// ============================================================================
// Client Config
// ============================================================================

/// Connection settings for a content API instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Server root URL (without the API prefix)
    #[serde(default)]
    pub base_url: String,

    /// Path segment of the REST API below the root
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// Authorization
    #[serde(default)]
    pub auth: AuthConfig,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent string
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Headers sent with every request
    #[serde(default)]
    pub default_headers: HashMap<String, String>,

    /// Page size used when fetching all documents
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
}

fn default_api_prefix() -> String {
    "api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("strapi-client/{}", env!("CARGO_PKG_VERSION"))
}

fn default_batch_size() -> u32 {
    25
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_prefix: default_api_prefix(),
            auth: AuthConfig::None,
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            default_headers: HashMap::new(),
            batch_size: default_batch_size(),
        }
    }
}

impl ClientConfig {
    /// Create a config for the given server root
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the API prefix
    #[must_use]
    pub fn api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = prefix.into();
        self
    }

    /// Use a static API token
    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.auth = AuthConfig::Token {
            token: token.into(),
        };
        self
    }

    /// Log in with user credentials
    #[must_use]
    pub fn credentials(mut self, identifier: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = AuthConfig::Credentials {
            identifier: identifier.into(),
            password: password.into(),
        };
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the batch size for fetch-all
    #[must_use]
    pub fn batch_size(mut self, size: u32) -> Self {
        self.batch_size = size;
        self
    }

    /// Add a default header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Request timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Server root with a trailing slash
    pub fn root_url(&self) -> Result<Url> {
        parse_root_url(&self.base_url)
    }

    /// REST API base (root joined with the prefix) with a trailing slash
    pub fn api_url(&self) -> Result<Url> {
        join_api_url(&self.base_url, &self.api_prefix)
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Load from a YAML file, apply environment overrides and validate
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let mut config = Self::from_file(path)?;
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Read a YAML file without environment overrides or validation
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::config(format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            }
        })?;

        Self::from_yaml(&content)
    }

    /// Parse a YAML document without environment overrides or validation
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Build from environment variables only
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Override fields from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Override fields from a variable lookup
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).none_if_empty();

        if let Some(url) = var(ENV_URL) {
            self.base_url = url;
        }

        match (var(ENV_TOKEN), var(ENV_IDENTIFIER), var(ENV_PASSWORD)) {
            (Some(token), _, _) => self.auth = AuthConfig::Token { token },
            (None, Some(identifier), Some(password)) => {
                self.auth = AuthConfig::Credentials {
                    identifier,
                    password,
                };
            }
            (None, Some(_), None) => return Err(Error::missing_field(ENV_PASSWORD)),
            (None, None, Some(_)) => return Err(Error::missing_field(ENV_IDENTIFIER)),
            (None, None, None) => {}
        }

        if let Some(timeout) = var(ENV_TIMEOUT_SECS) {
            self.timeout_secs = timeout.parse().map_err(|_| {
                Error::invalid_value(ENV_TIMEOUT_SECS, format!("not a number: '{timeout}'"))
            })?;
        }

        Ok(())
    }

    /// Check that the config can be used to build a client
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(Error::missing_field("base_url"));
        }

        let root = self.root_url()?;
        if !matches!(root.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "base_url",
                format!("unsupported scheme '{}'", root.scheme()),
            ));
        }

        if self.batch_size == 0 {
            return Err(Error::invalid_value("batch_size", "must be greater than 0"));
        }

        if self.timeout_secs == 0 {
            return Err(Error::invalid_value("timeout_secs", "must be greater than 0"));
        }

        match &self.auth {
            AuthConfig::Token { token } if token.is_empty() => {
                Err(Error::invalid_value("auth.token", "cannot be empty"))
            }
            AuthConfig::Credentials { identifier, .. } if identifier.is_empty() => {
                Err(Error::invalid_value("auth.identifier", "cannot be empty"))
            }
            _ => Ok(()),
        }
    }
}

/// Parse a server root, normalized to end with a slash
pub fn parse_root_url(base_url: &str) -> Result<Url> {
    let root = format!("{}/", base_url.trim_end_matches('/'));
    Ok(Url::parse(&root)?)
}

/// Join a server root and an API prefix into a base routes resolve against
pub fn join_api_url(base_url: &str, api_prefix: &str) -> Result<Url> {
    let root = parse_root_url(base_url)?;
    let prefix = api_prefix.trim_matches('/');
    if prefix.is_empty() {
        return Ok(root);
    }
    Ok(root.join(&format!("{prefix}/"))?)
}
