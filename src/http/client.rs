//! HTTP client for the content API
//!
//! Resolves routes against the API base, applies default headers and
//! authorization, and maps non-success statuses to crate errors:
//! - 401/403 → [`Error::Unauthorized`]
//! - 404 → [`Error::NotFound`]
//! - anything else → [`Error::HttpStatus`]

use crate::auth::{AuthConfig, Authenticator};
use crate::config::{join_api_url, parse_root_url, ClientConfig};
use crate::error::{Error, Result};
use crate::query::QueryParams;
use reqwest::multipart::Form;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Route of the health endpoint, relative to the server root
pub const HEALTH_ROUTE: &str = "_health";

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Server root URL
    pub base_url: String,
    /// API path below the root
    pub api_prefix: String,
    /// Request timeout
    pub timeout: Duration,
    /// Timeout of the health probe
    pub health_timeout: Duration,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_prefix: "api".to_string(),
            timeout: Duration::from_secs(30),
            health_timeout: Duration::from_secs(5),
            default_headers: HashMap::new(),
            user_agent: format!("strapi-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

impl From<&ClientConfig> for HttpClientConfig {
    fn from(config: &ClientConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_prefix: config.api_prefix.clone(),
            timeout: config.timeout(),
            default_headers: config.default_headers.clone(),
            user_agent: config.user_agent.clone(),
            ..Self::default()
        }
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the server root URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the API prefix
    pub fn api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.api_prefix = prefix.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the health probe timeout
    pub fn health_timeout(mut self, timeout: Duration) -> Self {
        self.config.health_timeout = timeout;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Configuration for a single request
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Query parameters
    pub query: QueryParams,
    /// Request headers
    pub headers: HashMap<String, String>,
    /// Request body (JSON)
    pub body: Option<Value>,
    /// Override timeout for this request
    pub timeout: Option<Duration>,
    /// Whether to apply authorization
    pub use_auth: bool,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            query: QueryParams::new(),
            headers: HashMap::new(),
            body: None,
            timeout: None,
            use_auth: true,
        }
    }
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add flattened query parameters
    #[must_use]
    pub fn params(mut self, params: QueryParams) -> Self {
        self.query.extend(params);
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Set timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Send without authorization
    #[must_use]
    pub fn without_auth(mut self) -> Self {
        self.use_auth = false;
        self
    }
}

/// HTTP client bound to one API instance
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    root_url: Url,
    api_url: Url,
    authenticator: Authenticator,
}

impl HttpClient {
    /// Create a new HTTP client without authorization
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        Self::with_auth(config, AuthConfig::None)
    }

    /// Create a client with authentication
    pub fn with_auth(config: HttpClientConfig, auth_config: AuthConfig) -> Result<Self> {
        let root_url = parse_root_url(&config.base_url)?;
        let api_url = join_api_url(&config.base_url, &config.api_prefix)?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(Error::Http)?;

        let authenticator =
            Authenticator::with_client(auth_config, client.clone()).with_api_base(&api_url);

        Ok(Self {
            client,
            config,
            root_url,
            api_url,
            authenticator,
        })
    }

    /// Create a client from a loaded client config
    pub fn from_client_config(config: &ClientConfig) -> Result<Self> {
        Self::with_auth(HttpClientConfig::from(config), config.auth.clone())
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// The authenticator applied to requests
    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    /// API base routes are resolved against
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// Server root
    pub fn root_url(&self) -> &Url {
        &self.root_url
    }

    /// Make a GET request
    pub async fn get(&self, route: &str, config: RequestConfig) -> Result<Response> {
        self.request(Method::GET, route, config).await
    }

    /// Make a POST request
    pub async fn post(&self, route: &str, config: RequestConfig) -> Result<Response> {
        self.request(Method::POST, route, config).await
    }

    /// Make a PUT request
    pub async fn put(&self, route: &str, config: RequestConfig) -> Result<Response> {
        self.request(Method::PUT, route, config).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, route: &str, config: RequestConfig) -> Result<Response> {
        self.request(Method::DELETE, route, config).await
    }

    /// Make a request against a route of the API
    pub async fn request(
        &self,
        method: Method,
        route: &str,
        config: RequestConfig,
    ) -> Result<Response> {
        let url = self.build_url(route)?;
        let mut req = self.client.request(method.clone(), url.clone());

        if let Some(ref body) = config.body {
            req = req.json(body);
        }

        let req = self.prepare(req, &config).await?;
        self.execute(req, &method, route, &url).await
    }

    /// POST a multipart form to a route of the API
    pub async fn multipart(&self, route: &str, form: Form, config: RequestConfig) -> Result<Response> {
        let url = self.build_url(route)?;
        let req = self.client.post(url.clone()).multipart(form);
        let req = self.prepare(req, &config).await?;
        self.execute(req, &Method::POST, route, &url).await
    }

    /// Make a request and parse JSON response
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        route: &str,
        config: RequestConfig,
    ) -> Result<T> {
        let response = self.request(method, route, config).await?;
        let json: T = response.json().await.map_err(Error::Http)?;
        Ok(json)
    }

    /// Make a GET request and parse JSON response
    pub async fn get_json<T: DeserializeOwned>(&self, route: &str, config: RequestConfig) -> Result<T> {
        self.request_json(Method::GET, route, config).await
    }

    /// Probe the health endpoint below the server root
    pub async fn check_health(&self) -> bool {
        let url = match self.root_url.join(HEALTH_ROUTE) {
            Ok(url) => url,
            Err(_) => return false,
        };

        match self
            .client
            .get(url)
            .timeout(self.config.health_timeout)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Health check failed: {}", e);
                false
            }
        }
    }

    /// Resolve a route against the API base
    fn build_url(&self, route: &str) -> Result<Url> {
        Ok(self.api_url.join(route.trim_start_matches('/'))?)
    }

    /// Apply headers, query, timeout and authorization
    async fn prepare(&self, mut req: RequestBuilder, config: &RequestConfig) -> Result<RequestBuilder> {
        for (key, value) in &self.config.default_headers {
            req = req.header(key.as_str(), value.as_str());
        }

        for (key, value) in &config.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if !config.query.is_empty() {
            req = req.query(&config.query);
        }

        if let Some(timeout) = config.timeout {
            req = req.timeout(timeout);
        }

        if config.use_auth {
            req = self.authenticator.apply(req).await?;
        }

        Ok(req)
    }

    async fn execute(&self, req: RequestBuilder, method: &Method, route: &str, url: &Url) -> Result<Response> {
        debug!("{} {}", method, url);

        let response = req.send().await.map_err(Error::Http)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!("{} {} failed with {}", method, url, status.as_u16());
            return Err(Error::from_status(status.as_u16(), route, body));
        }

        debug!("Request succeeded: {} {}", method, url);
        Ok(response)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("api_url", &self.api_url.as_str())
            .field("config", &self.config)
            .field("auth", self.authenticator.config())
            .finish_non_exhaustive()
    }
}
