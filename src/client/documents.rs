//! Client for content documents
//!
//! Collection types live under `/{plural_api_id}` and
//! `/{plural_api_id}/{document_id}`, single types under `/{single_api_id}`.
//! Write bodies are wrapped as `{"data": ...}`.

use super::pagination::OffsetPager;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::query::{DocumentQuery, QueryParams};
use crate::schema::RESERVED_FIELDS;
use crate::types::{DocumentResponse, DocumentsResponse, JsonObject, JsonValue};
use futures::stream::{self, Stream, TryStreamExt};
use reqwest::Response;
use serde_json::json;
use tracing::{debug, warn};

/// Client for one API instance
#[derive(Debug)]
pub struct StrapiClient {
    pub(crate) http: HttpClient,
    batch_size: u32,
}

impl StrapiClient {
    /// Create a client from a loaded config
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            http: HttpClient::from_client_config(config)?,
            batch_size: config.batch_size,
        })
    }

    /// Wrap an existing HTTP client
    pub fn from_http(http: HttpClient, batch_size: u32) -> Self {
        Self { http, batch_size }
    }

    /// Set the page size used by fetch-all
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: u32) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Underlying transport
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Page size used by fetch-all
    pub fn batch_size(&self) -> u32 {
        self.batch_size
    }

    /// Log in with the configured credentials and cache the JWT
    pub async fn authorize(&self) -> Result<()> {
        self.http.authenticator().login().await?;
        Ok(())
    }

    /// Whether the server answers its health probe
    pub async fn check_health(&self) -> bool {
        self.http.check_health().await
    }

    // ========================================================================
    // Collection Types
    // ========================================================================

    /// Get one document by its document id
    pub async fn get_document(
        &self,
        plural_api_id: &str,
        document_id: &str,
        query: &DocumentQuery,
    ) -> Result<DocumentResponse> {
        let route = document_route(plural_api_id, document_id, "get")?;
        self.http
            .get_json(&route, RequestConfig::new().params(query.to_params()))
            .await
    }

    /// Get one page of documents
    pub async fn get_documents(
        &self,
        plural_api_id: &str,
        query: &DocumentQuery,
    ) -> Result<DocumentsResponse> {
        self.http
            .get_json(plural_api_id, RequestConfig::new().params(query.to_params()))
            .await
    }

    /// Get every document matching the query.
    ///
    /// Pagination in `query` is replaced by an offset walk of `batch_size`
    /// entries. Data of all pages is concatenated; the meta of the last page
    /// is kept.
    pub async fn get_all_documents(
        &self,
        plural_api_id: &str,
        query: &DocumentQuery,
    ) -> Result<DocumentsResponse> {
        let pages = self.document_pages(plural_api_id, query.clone());
        futures::pin_mut!(pages);

        let mut all = DocumentsResponse::default();
        while let Some(page) = pages.try_next().await? {
            all.data.extend(page.data);
            all.meta = page.meta;
        }

        debug!("Fetched {} documents from {}", all.len(), plural_api_id);
        Ok(all)
    }

    /// Stream the pages of a fetch-all, one request per item
    pub fn document_pages<'a>(
        &'a self,
        plural_api_id: &'a str,
        query: DocumentQuery,
    ) -> impl Stream<Item = Result<DocumentsResponse>> + 'a {
        let pager = OffsetPager::new(self.batch_size, query.with_count);

        stream::try_unfold((pager, query), move |(mut pager, query)| async move {
            let Some(page_query) = pager.next_query(&query) else {
                return Ok(None);
            };

            let page = self.get_documents(plural_api_id, &page_query).await?;
            pager.advance(&page.meta)?;
            Ok::<_, Error>(Some((page, (pager, query))))
        })
    }

    /// Create a document
    pub async fn create_document(
        &self,
        plural_api_id: &str,
        data: JsonObject,
    ) -> Result<DocumentResponse> {
        self.http
            .request_json(
                reqwest::Method::POST,
                plural_api_id,
                RequestConfig::new().json(wrap_data(data)),
            )
            .await
    }

    /// Update fields of a document
    pub async fn update_document(
        &self,
        plural_api_id: &str,
        document_id: &str,
        data: JsonObject,
    ) -> Result<DocumentResponse> {
        let route = document_route(plural_api_id, document_id, "update")?;
        self.http
            .request_json(
                reqwest::Method::PUT,
                &route,
                RequestConfig::new().json(wrap_data(data)),
            )
            .await
    }

    /// Delete a document
    pub async fn delete_document(&self, plural_api_id: &str, document_id: &str) -> Result<()> {
        let route = document_route(plural_api_id, document_id, "delete")?;
        self.http.delete(&route, RequestConfig::new()).await?;
        Ok(())
    }

    // ========================================================================
    // Single Types
    // ========================================================================

    /// Get the document of a single type
    pub async fn get_single_document(
        &self,
        single_api_id: &str,
        query: &DocumentQuery,
    ) -> Result<DocumentResponse> {
        self.http
            .get_json(single_api_id, RequestConfig::new().params(query.to_params()))
            .await
    }

    /// Create or replace the document of a single type
    pub async fn put_single_document(
        &self,
        single_api_id: &str,
        data: JsonObject,
    ) -> Result<DocumentResponse> {
        self.http
            .request_json(
                reqwest::Method::PUT,
                single_api_id,
                RequestConfig::new().json(wrap_data(data)),
            )
            .await
    }

    /// Delete the document of a single type
    pub async fn delete_single_document(&self, single_api_id: &str) -> Result<()> {
        self.http.delete(single_api_id, RequestConfig::new()).await?;
        Ok(())
    }

    // ========================================================================
    // Custom Routes
    // ========================================================================

    /// GET a custom route
    pub async fn send_get(&self, route: &str, params: QueryParams) -> Result<Response> {
        self.http.get(route, RequestConfig::new().params(params)).await
    }

    /// POST a JSON body to a custom route
    pub async fn send_post(
        &self,
        route: &str,
        body: Option<JsonValue>,
        params: QueryParams,
    ) -> Result<Response> {
        self.http.post(route, body_config(body, params)).await
    }

    /// PUT a JSON body to a custom route
    pub async fn send_put(
        &self,
        route: &str,
        body: Option<JsonValue>,
        params: QueryParams,
    ) -> Result<Response> {
        self.http.put(route, body_config(body, params)).await
    }

    /// DELETE a custom route
    pub async fn send_delete(&self, route: &str) -> Result<Response> {
        self.http.delete(route, RequestConfig::new()).await
    }
}

/// Drop server-managed keys from a write body
pub fn strip_reserved(mut data: JsonObject) -> JsonObject {
    for key in RESERVED_FIELDS {
        if data.remove(*key).is_some() {
            warn!("Field '{}' is reserved and will be ignored", key);
        }
    }
    data
}

fn wrap_data(data: JsonObject) -> JsonValue {
    json!({ "data": strip_reserved(data) })
}

fn body_config(body: Option<JsonValue>, params: QueryParams) -> RequestConfig {
    let config = RequestConfig::new().params(params);
    match body {
        Some(body) => config.json(body),
        None => config,
    }
}

fn document_route(plural_api_id: &str, document_id: &str, operation: &str) -> Result<String> {
    if document_id.is_empty() {
        return Err(Error::missing_identifier(operation));
    }
    Ok(format!("{plural_api_id}/{document_id}"))
}
