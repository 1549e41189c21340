//! Typed documents
//!
//! A [`Document`] is a [`Record`] stored in a collection type. Every read
//! selects the scalar fields and populate tree derived from the record's
//! schema, and every write sends the projected record (relations reduced to
//! identifiers, managed fields dropped).

use crate::client::StrapiClient;
use crate::error::{Error, Result};
use crate::query::DocumentQuery;
use crate::schema::{self, project, Record};
use crate::types::{DocumentResponse, DocumentsResponse, JsonObject, JsonValue, ResponseMeta};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

/// Server-managed fields shared by stored documents.
///
/// Flatten it into a record type:
///
/// ```ignore
/// #[derive(Serialize, Deserialize)]
/// struct Article {
///     #[serde(flatten)]
///     meta: DocumentMeta,
///     title: String,
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl DocumentMeta {
    /// Meta of a document known only by its identifiers
    pub fn with_ids(id: u64, document_id: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            document_id: Some(document_id.into()),
            ..Self::default()
        }
    }

    /// Whether the document has been stored
    pub fn is_stored(&self) -> bool {
        self.document_id.as_deref().is_some_and(|id| !id.is_empty())
    }
}

/// Fields and populate tree of a record type as a read query
pub fn select_query<R: Record>() -> DocumentQuery {
    DocumentQuery::select(&schema::build(R::schema()))
}

/// Apply a record type's selection to a caller's query
fn with_selection<R: Record>(mut query: DocumentQuery) -> DocumentQuery {
    let selection = select_query::<R>();
    query.fields = selection.fields;
    query.populate = selection.populate;
    query
}

/// Decode a wire-keyed map into a record
pub fn decode<R: Record>(data: JsonObject) -> Result<R> {
    Ok(serde_json::from_value(Value::Object(data))?)
}

fn decode_response<R: Record>(response: DocumentResponse) -> Result<R> {
    let data = response
        .data
        .ok_or_else(|| Error::not_found(R::schema().name()))?;
    decode(data)
}

fn decode_list<R: Record>(response: DocumentsResponse) -> Result<(Vec<R>, ResponseMeta)> {
    let records = response
        .data
        .into_iter()
        .map(decode)
        .collect::<Result<Vec<R>>>()?;
    Ok((records, response.meta))
}

/// Equality filters on the unique, non-managed fields of a projected record
fn unique_filters<R: Record>(data: &JsonObject) -> Result<JsonValue> {
    let schema = R::schema();
    let mut filters = Map::new();

    for descriptor in schema.unique_fields() {
        let key = descriptor.wire_name();
        let condition = match data.get(key) {
            Some(value) if !value.is_null() => json!({ "$eq": value }),
            _ => json!({ "$null": true }),
        };
        filters.insert(key.to_string(), condition);
    }

    if filters.is_empty() {
        return Err(Error::config(format!(
            "'{}' declares no unique field to upsert on",
            schema.name()
        )));
    }
    Ok(Value::Object(filters))
}

/// A record stored in a collection type
#[async_trait]
pub trait Document: Record {
    /// Server-managed fields of this instance
    fn meta(&self) -> &DocumentMeta;

    /// Document id, if the document has been stored
    fn document_id(&self) -> Option<&str> {
        self.meta().document_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Get a document by its document id
    async fn get(client: &StrapiClient, document_id: &str) -> Result<Self> {
        let schema = Self::schema();
        let response = client
            .get_document(schema.plural_api_id(), document_id, &select_query::<Self>())
            .await?;
        decode_response(response)
    }

    /// Get one page of documents
    async fn list(client: &StrapiClient, query: DocumentQuery) -> Result<Vec<Self>> {
        Ok(Self::list_with_meta(client, query).await?.0)
    }

    /// Get one page of documents with the response meta
    async fn list_with_meta(
        client: &StrapiClient,
        query: DocumentQuery,
    ) -> Result<(Vec<Self>, ResponseMeta)> {
        let response = client
            .get_documents(Self::schema().plural_api_id(), &with_selection::<Self>(query))
            .await?;
        decode_list(response)
    }

    /// Get every matching document
    async fn list_all(client: &StrapiClient, query: DocumentQuery) -> Result<Vec<Self>> {
        let response = client
            .get_all_documents(Self::schema().plural_api_id(), &with_selection::<Self>(query))
            .await?;
        Ok(decode_list(response)?.0)
    }

    /// First matching document
    async fn first(client: &StrapiClient, query: DocumentQuery) -> Result<Option<Self>> {
        let query = query.offset(0, 1).with_count(false);
        Ok(Self::list(client, query).await?.into_iter().next())
    }

    /// Create this document and return the stored version
    async fn create(&self, client: &StrapiClient) -> Result<Self> {
        let data = project(self, true)?;
        let response = client
            .create_document(Self::schema().plural_api_id(), data)
            .await?;
        reload::<Self>(client, response).await
    }

    /// Reload this document from the server
    async fn refresh(&mut self, client: &StrapiClient) -> Result<()> {
        let document_id = self
            .document_id()
            .ok_or_else(|| Error::missing_identifier("refresh"))?
            .to_string();
        *self = Self::get(client, &document_id).await?;
        Ok(())
    }

    /// Send this document's fields and return the stored version
    async fn update(&self, client: &StrapiClient) -> Result<Self> {
        let document_id = self
            .document_id()
            .ok_or_else(|| Error::missing_identifier("update"))?;
        let data = project(self, true)?;
        let response = client
            .update_document(Self::schema().plural_api_id(), document_id, data)
            .await?;
        reload::<Self>(client, response).await
    }

    /// Delete this document
    async fn delete(&self, client: &StrapiClient) -> Result<()> {
        let document_id = self
            .document_id()
            .ok_or_else(|| Error::missing_identifier("delete"))?;
        client
            .delete_document(Self::schema().plural_api_id(), document_id)
            .await
    }

    /// Create this document, or update the one matching its unique fields.
    ///
    /// An existing document whose projected fields already equal this one's
    /// is returned without a write.
    async fn upsert(&self, client: &StrapiClient) -> Result<Self> {
        let schema = Self::schema();
        let data = project(self, true)?;
        let query = select_query::<Self>()
            .filters(unique_filters::<Self>(&data)?)
            .offset(0, 1)
            .with_count(true);

        let response = client.get_documents(schema.plural_api_id(), &query).await?;
        let total = response.meta.total_count()?;

        if total > 1 {
            return Err(Error::AmbiguousMatch { count: total });
        }

        let Some(current) = response.data.into_iter().next() else {
            debug!("No {} matches, creating", schema.name());
            return self.create(client).await;
        };

        let current: Self = decode(current)?;
        if project(&current, true)? == data {
            debug!("{} is unchanged", schema.name());
            return Ok(current);
        }

        let document_id = current
            .document_id()
            .ok_or_else(|| Error::missing_identifier("update"))?;
        let response = client
            .update_document(schema.plural_api_id(), document_id, data)
            .await?;
        reload::<Self>(client, response).await
    }
}

/// Decode a write response, re-reading it when relations must be populated
async fn reload<D: Document>(client: &StrapiClient, response: DocumentResponse) -> Result<D> {
    let stored: D = decode_response(response)?;
    if !schema::build(D::schema()).has_populate() {
        return Ok(stored);
    }

    match stored.document_id() {
        Some(document_id) => D::get(client, document_id).await,
        None => Ok(stored),
    }
}

/// A record stored as a single type
#[async_trait]
pub trait SingleDocument: Record {
    /// Get the document
    async fn get(client: &StrapiClient) -> Result<Self> {
        let response = client
            .get_single_document(Self::schema().single_api_id(), &select_query::<Self>())
            .await?;
        decode_response(response)
    }

    /// Create or replace the document
    async fn put(&self, client: &StrapiClient) -> Result<Self> {
        let data = project(self, true)?;
        client
            .put_single_document(Self::schema().single_api_id(), data)
            .await?;
        Self::get(client).await
    }

    /// Delete the document
    async fn delete(client: &StrapiClient) -> Result<()> {
        client
            .delete_single_document(Self::schema().single_api_id())
            .await
    }
}
