//! Typed documents over the client
//!
//! # Features
//!
//! - **Document**: collection type CRUD with schema-driven field selection
//! - **SingleDocument**: get/put/delete of single types
//! - **Upsert**: match on unique fields, write only when something changed
//! - **Media**: uploaded images with their resized variants
//! - **Webhooks**: typed event payloads

mod document;
mod media;
mod webhook;

pub use document::{decode, select_query, Document, DocumentMeta, SingleDocument};
pub use media::{MediaImageDocument, MediaImageFormatVariant, MediaImageFormats};
pub use webhook::{WebhookEvent, WebhookPayload};

#[cfg(test)]
mod tests;
