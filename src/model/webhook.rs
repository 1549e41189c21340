//! Webhook payloads sent by the server on content events

use super::document::decode;
use crate::error::{Error, Result};
use crate::schema::Record;
use crate::types::JsonObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the event that triggered a webhook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WebhookEvent {
    #[serde(rename = "entry.create")]
    EntryCreate,
    #[serde(rename = "entry.update")]
    EntryUpdate,
    #[serde(rename = "entry.delete")]
    EntryDelete,
    #[serde(rename = "entry.publish")]
    EntryPublish,
    #[serde(rename = "entry.unpublish")]
    EntryUnpublish,
    #[serde(rename = "media.create")]
    MediaCreate,
    #[serde(rename = "media.update")]
    MediaUpdate,
    #[serde(rename = "media.delete")]
    MediaDelete,
}

impl WebhookEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            WebhookEvent::EntryCreate => "entry.create",
            WebhookEvent::EntryUpdate => "entry.update",
            WebhookEvent::EntryDelete => "entry.delete",
            WebhookEvent::EntryPublish => "entry.publish",
            WebhookEvent::EntryUnpublish => "entry.unpublish",
            WebhookEvent::MediaCreate => "media.create",
            WebhookEvent::MediaUpdate => "media.update",
            WebhookEvent::MediaDelete => "media.delete",
        }
    }

    /// Whether the event concerns a media library file
    pub fn is_media(self) -> bool {
        matches!(
            self,
            WebhookEvent::MediaCreate | WebhookEvent::MediaUpdate | WebhookEvent::MediaDelete
        )
    }
}

impl fmt::Display for WebhookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of a webhook request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub event: WebhookEvent,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    /// Singular API id of the content type
    #[serde(default)]
    pub model: Option<String>,
    /// Content type UID
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub entry: Option<JsonObject>,
}

impl WebhookPayload {
    /// Parse a raw request body
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Whether the payload concerns the content type of `R`
    pub fn is_model<R: Record>(&self) -> bool {
        self.model.as_deref() == Some(R::schema().single_api_id())
    }

    /// Decode the entry as `R`
    pub fn entry_as<R: Record>(&self) -> Result<R> {
        let entry = self
            .entry
            .clone()
            .ok_or_else(|| Error::Other(format!("Webhook '{}' carries no entry", self.event)))?;
        decode(entry)
    }
}
