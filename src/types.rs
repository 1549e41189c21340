//! Common types used throughout the client
//!
//! JSON aliases and the response envelopes returned by the content API.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Response Envelopes
// ============================================================================

/// Pagination block of a list response.
///
/// Page-based requests report `page/pageSize/pageCount`, offset-based
/// requests report `start/limit`. `total` is present when the count was
/// requested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponsePagination {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

/// Response metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<ResponsePagination>,
    /// Anything else the server reports
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl ResponseMeta {
    /// Total number of matching entries
    pub fn total_count(&self) -> Result<u64> {
        self.pagination
            .as_ref()
            .and_then(|p| p.total)
            .ok_or(Error::MissingTotal)
    }
}

/// Single entry response: `{data, meta}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentResponse {
    #[serde(default)]
    pub data: Option<JsonObject>,
    #[serde(default)]
    pub meta: ResponseMeta,
}

/// List response: `{data: [..], meta}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentsResponse {
    #[serde(default)]
    pub data: Vec<JsonObject>,
    #[serde(default)]
    pub meta: ResponseMeta,
}

impl DocumentsResponse {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}
