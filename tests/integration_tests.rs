//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: record schemas → query parameters → HTTP
//! requests → typed documents

use once_cell::sync::Lazy;
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::json;
use strapi_client::model::{WebhookEvent, WebhookPayload};
use strapi_client::query::flatten_parameter;
use strapi_client::{
    build, project, ClientConfig, Document, DocumentMeta, DocumentQuery, FieldDescriptor,
    FieldType, MediaImageDocument, Record, Schema, StrapiClient,
};
use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Blog Schema
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Author {
    #[serde(flatten)]
    meta: DocumentMeta,
    name: String,
    #[serde(default)]
    avatar: Option<MediaImageDocument>,
}

impl Record for Author {
    fn schema() -> &'static Schema {
        static SCHEMA: Lazy<Schema> = Lazy::new(|| {
            Schema::document("Author")
                .document_fields()
                .field("name", FieldType::Text)
                .field("avatar", FieldType::optional_record(MediaImageDocument::schema))
                .build()
        });
        &SCHEMA
    }
}

impl Document for Author {
    fn meta(&self) -> &DocumentMeta {
        &self.meta
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Seo {
    meta_title: String,
}

impl Record for Seo {
    fn schema() -> &'static Schema {
        static SCHEMA: Lazy<Schema> = Lazy::new(|| {
            Schema::component("Seo")
                .descriptor(FieldDescriptor::new("meta_title", FieldType::Text).alias("metaTitle"))
                .build()
        });
        &SCHEMA
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Article {
    #[serde(flatten)]
    meta: DocumentMeta,
    title: String,
    slug: String,
    #[serde(default)]
    author: Option<Author>,
    #[serde(default)]
    cover: Option<MediaImageDocument>,
    #[serde(default)]
    seo: Option<Seo>,
    #[serde(default)]
    related: Vec<Article>,
}

impl Record for Article {
    fn schema() -> &'static Schema {
        static SCHEMA: Lazy<Schema> = Lazy::new(|| {
            Schema::document("Article")
                .document_fields()
                .field("title", FieldType::Text)
                .descriptor(FieldDescriptor::new("slug", FieldType::Text).unique())
                .field("author", FieldType::optional_record(Author::schema))
                .field("cover", FieldType::optional_record(MediaImageDocument::schema))
                .field("seo", FieldType::optional_record(Seo::schema))
                .field("related", FieldType::records(Article::schema))
                .build()
        });
        &SCHEMA
    }
}

impl Document for Article {
    fn meta(&self) -> &DocumentMeta {
        &self.meta
    }
}

fn author_json() -> serde_json::Value {
    json!({
        "id": 4,
        "documentId": "auth4",
        "name": "Ada",
        "avatar": null
    })
}

fn article_json(id: u64, slug: &str, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "documentId": format!("art{id}"),
        "createdAt": "2024-03-01T10:00:00.000Z",
        "updatedAt": "2024-03-01T10:00:00.000Z",
        "publishedAt": "2024-03-01T10:00:00.000Z",
        "title": title,
        "slug": slug,
        "author": author_json(),
        "cover": null,
        "seo": { "metaTitle": title },
        "related": []
    })
}

fn offset_page(items: Vec<serde_json::Value>, start: u64, total: u64) -> serde_json::Value {
    json!({
        "data": items,
        "meta": { "pagination": { "start": start, "limit": 2, "total": total } }
    })
}

// ============================================================================
// Populate Engine
// ============================================================================

#[test]
fn test_blog_populate_tree() {
    let query = build(Article::schema());

    assert_eq!(
        query.fields,
        vec!["id", "documentId", "createdAt", "updatedAt", "publishedAt", "title", "slug"]
    );
    assert_eq!(
        query.populate_value(),
        json!({
            "author": {
                "fields": ["id", "documentId", "createdAt", "updatedAt", "publishedAt", "name"],
                "populate": { "avatar": true }
            },
            "cover": true,
            "seo": true,
            "related": true
        })
    );
}

#[test]
fn test_blog_select_query_params() {
    let params = DocumentQuery::select(&build(Article::schema())).to_params();

    assert_eq!(params.get("fields[6]").map(String::as_str), Some("slug"));
    assert_eq!(
        params.get("populate[author][fields][5]").map(String::as_str),
        Some("name")
    );
    assert_eq!(
        params
            .get("populate[author][populate][avatar]")
            .map(String::as_str),
        Some("true")
    );
    assert_eq!(params.get("populate[seo]").map(String::as_str), Some("true"));
}

#[test]
fn test_blog_projection() {
    let article: Article = serde_json::from_value(article_json(1, "hello", "Hello")).unwrap();
    let data = project(&article, true).unwrap();

    assert_eq!(data.get("author"), Some(&json!(4)));
    assert_eq!(data.get("seo"), Some(&json!({ "metaTitle": "Hello" })));
    assert!(!data.contains_key("documentId"));
    assert!(!data.contains_key("createdAt"));
}

// ============================================================================
// Client Flows
// ============================================================================

#[tokio::test]
async fn test_credentials_login_and_fetch_all() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/local"))
        .and(body_json(json!({ "identifier": "editor", "password": "secret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jwt": "jwt-1",
            "user": { "id": 1, "username": "editor" }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .and(header("Authorization", "Bearer jwt-1"))
        .and(query_param("pagination[start]", "0"))
        .and(query_param("pagination[withCount]", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(offset_page(
            vec![article_json(1, "one", "One"), article_json(2, "two", "Two")],
            0,
            3,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .and(header("Authorization", "Bearer jwt-1"))
        .and(query_param("pagination[start]", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(offset_page(
            vec![article_json(3, "three", "Three")],
            2,
            3,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ClientConfig::new(mock_server.uri())
        .credentials("editor", "secret")
        .batch_size(2);
    let client = StrapiClient::new(&config).unwrap();

    let articles = Article::list_all(&client, DocumentQuery::new()).await.unwrap();

    let slugs: Vec<&str> = articles.iter().map(|a| a.slug.as_str()).collect();
    assert_eq!(slugs, vec!["one", "two", "three"]);
    assert_eq!(articles[0].author.as_ref().unwrap().name, "Ada");
}

#[tokio::test]
async fn test_upsert_updates_changed_article() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .and(query_param("filters[slug][$eq]", "hello"))
        .respond_with(ResponseTemplate::new(200).set_body_json(offset_page(
            vec![article_json(1, "hello", "Old title")],
            0,
            1,
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/articles/art1"))
        .and(body_partial_json(json!({
            "data": { "title": "New title", "slug": "hello", "author": 4 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": article_json(1, "hello", "New title"),
            "meta": {}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/articles/art1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": article_json(1, "hello", "New title"),
            "meta": {}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = StrapiClient::new(&ClientConfig::new(mock_server.uri()).token("tok")).unwrap();

    let mut local: Article =
        serde_json::from_value(article_json(1, "hello", "New title")).unwrap();
    local.meta = DocumentMeta::default();

    let stored = local.upsert(&client).await.unwrap();
    assert_eq!(stored.title, "New title");
    assert_eq!(stored.document_id(), Some("art1"));
}

#[tokio::test]
async fn test_rejected_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles/art1"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Missing or invalid credentials"))
        .mount(&mock_server)
        .await;

    let client = StrapiClient::new(&ClientConfig::new(mock_server.uri()).token("bad")).unwrap();
    let err = Article::get(&client, "art1").await.unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn test_custom_route_with_flattened_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles/count"))
        .and(query_param("filters[author][name][$eq]", "Ada"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "count": 2 })))
        .mount(&mock_server)
        .await;

    let client = StrapiClient::new(&ClientConfig::new(mock_server.uri())).unwrap();
    let params = flatten_parameter("filters", &json!({ "author": { "name": { "$eq": "Ada" } } }));
    let response = client.send_get("articles/count", params).await.unwrap();
    let body: serde_json::Value = response.json().await.unwrap();

    assert_eq!(body["count"], 2);
}

// ============================================================================
// Webhooks
// ============================================================================

#[test]
fn test_webhook_entry_decodes_as_article() {
    let body = serde_json::to_vec(&json!({
        "event": "entry.publish",
        "createdAt": "2024-03-01T10:00:05.000Z",
        "model": "article",
        "uid": "api::article.article",
        "entry": article_json(1, "hello", "Hello")
    }))
    .unwrap();

    let payload = WebhookPayload::from_slice(&body).unwrap();
    assert_eq!(payload.event, WebhookEvent::EntryPublish);
    assert!(payload.is_model::<Article>());
    assert!(!payload.is_model::<Author>());

    let article: Article = payload.entry_as().unwrap();
    assert_eq!(article.slug, "hello");
    assert_eq!(article.seo.unwrap().meta_title, "Hello");
}
