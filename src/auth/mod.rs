//! Authentication module
//!
//! Supports: public access, static API tokens, and user credentials
//!
//! The `Authenticator` applies the bearer token to each request and, for
//! credentials, logs in once and caches the returned JWT.

mod authenticator;
mod types;

pub use authenticator::{Authenticator, LOGIN_ROUTE};
pub use types::{AuthConfig, CachedToken};
