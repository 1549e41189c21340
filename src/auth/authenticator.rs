//! Authenticator implementation
//!
//! Applies the configured authorization to requests and performs the
//! credentials login when a JWT is needed.

use super::types::{AuthConfig, CachedToken};
use crate::error::{Error, Result};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use url::Url;

/// Route of the local login endpoint, relative to the API base
pub const LOGIN_ROUTE: &str = "auth/local";

/// Authenticator handles applying authentication to HTTP requests
pub struct Authenticator {
    /// Auth configuration
    config: AuthConfig,
    /// JWT obtained by the last login
    cached_token: Arc<RwLock<Option<CachedToken>>>,
    /// HTTP client for login requests
    http_client: Client,
    /// Absolute login URL
    login_url: Option<Url>,
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
            login_url: None,
        }
    }

    /// Set the API base the login route is resolved against
    #[must_use]
    pub fn with_api_base(mut self, api_base: &Url) -> Self {
        self.login_url = api_base.join(LOGIN_ROUTE).ok();
        self
    }

    /// Apply authentication to a request builder
    pub async fn apply(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        match &self.config {
            AuthConfig::None => Ok(req),
            AuthConfig::Token { token } => Ok(req.bearer_auth(token)),
            AuthConfig::Credentials { .. } => {
                let token = self.get_or_login().await?;
                Ok(req.bearer_auth(token))
            }
        }
    }

    /// Log in now and cache the returned JWT
    pub async fn login(&self) -> Result<String> {
        let mut cached = self.cached_token.write().await;
        let new_token = self.fetch_session_token().await?;
        let token_str = new_token.token.clone();
        *cached = Some(new_token);
        Ok(token_str)
    }

    /// Get a valid token, logging in if necessary
    async fn get_or_login(&self) -> Result<String> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                if !token.is_expired() {
                    return Ok(token.token.clone());
                }
            }
        }

        let mut cached = self.cached_token.write().await;

        // Another task may have logged in while we waited for the lock
        if let Some(token) = cached.as_ref() {
            if !token.is_expired() {
                return Ok(token.token.clone());
            }
        }

        let new_token = self.fetch_session_token().await?;
        let token_str = new_token.token.clone();
        *cached = Some(new_token);

        Ok(token_str)
    }

    /// POST `{identifier, password}` to the login route and read `jwt`
    async fn fetch_session_token(&self) -> Result<CachedToken> {
        let AuthConfig::Credentials {
            identifier,
            password,
        } = &self.config
        else {
            return Err(Error::config("Login requires credentials auth"));
        };

        let login_url = self
            .login_url
            .as_ref()
            .ok_or_else(|| Error::config("Login URL is not configured"))?;

        debug!("Logging in as {} at {}", identifier, login_url);

        let response = self
            .http_client
            .post(login_url.clone())
            .json(&json!({ "identifier": identifier, "password": password }))
            .send()
            .await
            .map_err(Error::Http)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Unauthorized { status, body });
        }

        let login: LoginResponse = response.json().await.map_err(Error::Http)?;
        info!("Logged in as {}", identifier);

        Ok(CachedToken::new(login.jwt, None))
    }

    /// Clear the cached token (forces a new login)
    pub async fn clear_cache(&self) {
        let mut cached = self.cached_token.write().await;
        *cached = None;
    }

    /// Whether a JWT from a previous login is cached
    pub async fn has_token(&self) -> bool {
        self.cached_token.read().await.is_some()
    }

    /// Get the current auth config
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("config", &self.config)
            .field("login_url", &self.login_url)
            .finish_non_exhaustive()
    }
}

/// Login response
#[derive(Debug, Deserialize)]
struct LoginResponse {
    jwt: String,
}
