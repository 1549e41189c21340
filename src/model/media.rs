//! Image files of the media library

use super::document::{decode, DocumentMeta};
use crate::client::StrapiClient;
use crate::error::{Error, Result};
use crate::query::DocumentQuery;
use crate::schema::{FieldDescriptor, FieldType, Record, Schema};
use crate::types::JsonValue;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// One resized variant of an uploaded image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaImageFormatVariant {
    pub ext: String,
    pub url: String,
    pub hash: String,
    pub mime: String,
    pub name: String,
    #[serde(default)]
    pub path: Option<String>,
    /// Size in kilobytes
    pub size: f64,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub size_in_bytes: Option<u64>,
}

/// Generated variants, each present only when the original is large enough
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaImageFormats {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<MediaImageFormatVariant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small: Option<MediaImageFormatVariant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<MediaImageFormatVariant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large: Option<MediaImageFormatVariant>,
}

impl MediaImageFormats {
    /// Largest available variant
    pub fn largest(&self) -> Option<&MediaImageFormatVariant> {
        self.large
            .as_ref()
            .or(self.medium.as_ref())
            .or(self.small.as_ref())
            .or(self.thumbnail.as_ref())
    }
}

/// An uploaded image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaImageDocument {
    #[serde(flatten)]
    pub meta: DocumentMeta,
    pub name: String,
    #[serde(default)]
    pub alternative_text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub formats: MediaImageFormats,
    pub hash: String,
    pub ext: String,
    pub mime: String,
    /// Size in kilobytes
    pub size: f64,
    pub url: String,
    #[serde(default)]
    pub preview_url: Option<String>,
    pub provider: String,
    #[serde(default, rename = "provider_metadata")]
    pub provider_metadata: Option<JsonValue>,
}

impl MediaImageDocument {
    /// Largest resized variant
    pub fn largest_format(&self) -> Result<&MediaImageFormatVariant> {
        self.formats
            .largest()
            .ok_or_else(|| Error::Other(format!("Image '{}' has no variants", self.name)))
    }

    /// List images of the media library
    pub async fn list(client: &StrapiClient, query: &DocumentQuery) -> Result<Vec<Self>> {
        client
            .get_uploaded_files(query)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }
}

impl Record for MediaImageDocument {
    fn schema() -> &'static Schema {
        static SCHEMA: Lazy<Schema> = Lazy::new(|| {
            Schema::media("MediaImageDocument")
                .document_fields()
                .field("name", FieldType::Text)
                .descriptor(
                    FieldDescriptor::new("alternative_text", FieldType::optional(FieldType::Text))
                        .alias("alternativeText"),
                )
                .field("caption", FieldType::optional(FieldType::Text))
                .field("width", FieldType::Integer)
                .field("height", FieldType::Integer)
                .field("formats", FieldType::Json)
                .field("hash", FieldType::Text)
                .field("ext", FieldType::Text)
                .field("mime", FieldType::Text)
                .field("size", FieldType::Float)
                .field("url", FieldType::Text)
                .descriptor(
                    FieldDescriptor::new("preview_url", FieldType::optional(FieldType::Text))
                        .alias("previewUrl"),
                )
                .field("provider", FieldType::Text)
                .field("provider_metadata", FieldType::optional(FieldType::Json))
                .plural_api_id("upload/files")
                .build()
        });
        &SCHEMA
    }
}
