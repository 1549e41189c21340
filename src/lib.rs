// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Strapi Client
//!
//! A typed client for Strapi headless CMS content APIs.
//!
//! ## Features
//!
//! - **Declarative Schemas**: Record types declare their fields once; reads
//!   select exactly those fields and populate exactly the relations they hold
//! - **Populate Engine**: Nested `fields`/`populate` trees with cycle protection
//! - **Write Projection**: Related records are sent as identifiers
//! - **Upsert**: Match on unique fields and write only on change
//! - **Fetch-All**: Offset pagination over every page of a collection
//! - **Auth**: API tokens or credential login with a cached JWT
//! - **Media**: Multipart uploads and typed image documents
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use strapi_client::{ClientConfig, Document, StrapiClient};
//!
//! #[tokio::main]
//! async fn main() -> strapi_client::Result<()> {
//!     let config = ClientConfig::new("http://localhost:1337").token("...");
//!     let client = StrapiClient::new(&config)?;
//!
//!     // Article implements Record and Document
//!     let article = Article::get(&client, "abc123").await?;
//!     let stored = article.upsert(&client).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Typed Documents                          │
//! │  Document: get/list/create/update/delete/upsert   SingleDocument│
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │  Schema  │   Query   │    Client     │   HTTP    │    Auth     │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ Fields   │ Filters   │ Documents     │ GET/POST  │ API token   │
//! │ Classify │ Populate  │ Fetch-all     │ PUT/DELETE│ Credentials │
//! │ Populate │ Paginate  │ Uploads       │ Multipart │ JWT cache   │
//! │ Project  │ Flatten   │ Single types  │ Health    │             │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)] // TODO: Document public fields of the response and config types

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication with API tokens and credentials
pub mod auth;

/// HTTP transport
pub mod http;

/// Client configuration
pub mod config;

/// Record schemas and the populate engine
pub mod schema;

/// Query parameters
pub mod query;

/// Content API client
pub mod client;

/// Typed documents
pub mod model;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use client::{FilePayload, StrapiClient, UploadTarget};
pub use config::ClientConfig;
pub use model::{Document, DocumentMeta, MediaImageDocument, SingleDocument};
pub use query::{DocumentQuery, Populate, PublicationState};
pub use schema::{build, project, FieldDescriptor, FieldType, Record, Schema};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
