//! HTTP client module
//!
//! Thin transport over reqwest for one API instance.
//!
//! # Features
//!
//! - **Route Resolution**: Routes resolve against the server root plus API prefix
//! - **Authentication**: Integration with auth module
//! - **Error Mapping**: Non-success statuses become typed errors
//! - **Multipart**: Form uploads share the same header and auth handling

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig, HEALTH_ROUTE};
