//! Tests for the model module

use super::*;
use crate::client::StrapiClient;
use crate::config::ClientConfig;
use crate::error::Error;
use crate::query::DocumentQuery;
use crate::schema::{FieldDescriptor, FieldType, Record, Schema};
use once_cell::sync::Lazy;
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Fixtures
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Category {
    #[serde(flatten)]
    meta: DocumentMeta,
    name: String,
}

impl Record for Category {
    fn schema() -> &'static Schema {
        static SCHEMA: Lazy<Schema> = Lazy::new(|| {
            Schema::document("Category")
                .document_fields()
                .field("name", FieldType::Text)
                .plural_api_id("categories")
                .build()
        });
        &SCHEMA
    }
}

impl Document for Category {
    fn meta(&self) -> &DocumentMeta {
        &self.meta
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Article {
    #[serde(flatten)]
    meta: DocumentMeta,
    title: String,
    slug: String,
    #[serde(default)]
    category: Option<Category>,
}

impl Record for Article {
    fn schema() -> &'static Schema {
        static SCHEMA: Lazy<Schema> = Lazy::new(|| {
            Schema::document("Article")
                .document_fields()
                .field("title", FieldType::Text)
                .descriptor(FieldDescriptor::new("slug", FieldType::Text).unique())
                .field("category", FieldType::optional_record(Category::schema))
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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Homepage {
    #[serde(flatten)]
    meta: DocumentMeta,
    headline: String,
}

impl Record for Homepage {
    fn schema() -> &'static Schema {
        static SCHEMA: Lazy<Schema> = Lazy::new(|| {
            Schema::document("Homepage")
                .document_fields()
                .field("headline", FieldType::Text)
                .build()
        });
        &SCHEMA
    }
}

impl SingleDocument for Homepage {}

fn client_for(server: &MockServer) -> StrapiClient {
    StrapiClient::new(&ClientConfig::new(server.uri()).token("tok")).unwrap()
}

fn category_json() -> serde_json::Value {
    json!({
        "id": 3,
        "documentId": "cat3",
        "createdAt": "2024-01-01T00:00:00.000Z",
        "updatedAt": "2024-01-01T00:00:00.000Z",
        "publishedAt": "2024-01-01T00:00:00.000Z",
        "name": "News"
    })
}

fn stored_article(title: &str) -> serde_json::Value {
    json!({
        "id": 1,
        "documentId": "art1",
        "createdAt": "2024-01-02T00:00:00.000Z",
        "updatedAt": "2024-01-02T00:00:00.000Z",
        "publishedAt": "2024-01-02T00:00:00.000Z",
        "title": title,
        "slug": "hello",
        "category": category_json()
    })
}

fn draft_article(title: &str) -> Article {
    Article {
        meta: DocumentMeta::default(),
        title: title.to_string(),
        slug: "hello".to_string(),
        category: Some(Category {
            meta: DocumentMeta::with_ids(3, "cat3"),
            name: "News".to_string(),
        }),
    }
}

fn list_response(items: Vec<serde_json::Value>, total: u64) -> serde_json::Value {
    json!({
        "data": items,
        "meta": {"pagination": {"start": 0, "limit": 1, "total": total}}
    })
}

// ============================================================================
// Selection Tests
// ============================================================================

#[test]
fn test_select_query() {
    let query = select_query::<Article>();
    assert_eq!(
        query.fields,
        vec!["id", "documentId", "createdAt", "updatedAt", "publishedAt", "title", "slug"]
    );

    let params = query.to_params();
    assert_eq!(params.get("populate[category][fields][5]").unwrap(), "name");
    assert!(select_query::<Category>().populate.is_none());
}

#[test]
fn test_document_meta_serde() {
    let meta = DocumentMeta::with_ids(5, "doc5");
    assert!(meta.is_stored());
    assert_eq!(
        serde_json::to_value(&meta).unwrap(),
        json!({"id": 5, "documentId": "doc5"})
    );
    assert!(!DocumentMeta::default().is_stored());
}

// ============================================================================
// Document Tests
// ============================================================================

#[tokio::test]
async fn test_get_document() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles/art1"))
        .and(query_param("fields[5]", "title"))
        .and(query_param("populate[category][fields][0]", "id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": stored_article("Hello"), "meta": {}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let article = Article::get(&client, "art1").await.unwrap();

    assert_eq!(article.title, "Hello");
    assert_eq!(article.document_id(), Some("art1"));
    assert_eq!(article.category.unwrap().name, "News");
}

#[tokio::test]
async fn test_first_document() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .and(query_param("pagination[limit]", "1"))
        .and(query_param("pagination[withCount]", "false"))
        .and(query_param("sort[0]", "name:asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [category_json()], "meta": {}
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let first = Category::first(&client, DocumentQuery::new().sort("name:asc"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.name, "News");
}

#[tokio::test]
async fn test_create_projects_and_reloads() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/articles"))
        .and(body_json(json!({
            "data": {"title": "Hello", "slug": "hello", "category": 3}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {
                "id": 1, "documentId": "art1",
                "title": "Hello", "slug": "hello"
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/articles/art1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": stored_article("Hello")
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let created = draft_article("Hello").create(&client).await.unwrap();

    assert_eq!(created.meta.id, Some(1));
    assert!(created.category.is_some());
}

#[tokio::test]
async fn test_create_without_relations_skips_reload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/categories"))
        .and(body_json(json!({"data": {"name": "News"}})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": category_json()
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let category = Category {
        meta: DocumentMeta::default(),
        name: "News".to_string(),
    };
    let created = category.create(&client).await.unwrap();
    assert_eq!(created.document_id(), Some("cat3"));
}

#[tokio::test]
async fn test_write_without_document_id() {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server);
    let mut article = draft_article("Hello");

    let err = article.update(&client).await.unwrap_err();
    assert_eq!(err.to_string(), "Document ID cannot be empty to update document");

    let err = article.delete(&client).await.unwrap_err();
    assert!(matches!(err, Error::MissingIdentifier { .. }));

    let err = article.refresh(&client).await.unwrap_err();
    assert!(matches!(err, Error::MissingIdentifier { .. }));
}

#[tokio::test]
async fn test_refresh_and_delete() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/categories/cat3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": category_json()
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/categories/cat3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let mut category = Category {
        meta: DocumentMeta::with_ids(3, "cat3"),
        name: "Stale".to_string(),
    };
    category.refresh(&client).await.unwrap();
    assert_eq!(category.name, "News");

    category.delete(&client).await.unwrap();
}

// ============================================================================
// Upsert Tests
// ============================================================================

#[tokio::test]
async fn test_upsert_creates_when_missing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .and(query_param("filters[slug][$eq]", "hello"))
        .and(query_param("pagination[withCount]", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(list_response(vec![], 0)))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/articles"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {"id": 1, "documentId": "art1", "title": "Hello", "slug": "hello"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/articles/art1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": stored_article("Hello")
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let stored = draft_article("Hello").upsert(&client).await.unwrap();
    assert_eq!(stored.document_id(), Some("art1"));
}

#[tokio::test]
async fn test_upsert_unchanged_skips_write() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(list_response(vec![stored_article("Hello")], 1)),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let stored = draft_article("Hello").upsert(&client).await.unwrap();
    assert_eq!(stored.meta.id, Some(1));
}

#[tokio::test]
async fn test_upsert_updates_changed_document() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(list_response(vec![stored_article("Old title")], 1)),
        )
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/articles/art1"))
        .and(body_json(json!({
            "data": {"title": "New title", "slug": "hello", "category": 3}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": 1, "documentId": "art1", "title": "New title", "slug": "hello"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/articles/art1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": stored_article("New title")
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let stored = draft_article("New title").upsert(&client).await.unwrap();
    assert_eq!(stored.title, "New title");
}

#[tokio::test]
async fn test_upsert_ambiguous() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/articles"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(list_response(vec![stored_article("Hello")], 2)),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = draft_article("Hello").upsert(&client).await.unwrap_err();
    assert_eq!(err.to_string(), "Keys are ambiguous, found 2 records");
}

#[tokio::test]
async fn test_upsert_requires_unique_field() {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server);

    let category = Category {
        meta: DocumentMeta::default(),
        name: "News".to_string(),
    };
    let err = category.upsert(&client).await.unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

// ============================================================================
// Single Type Tests
// ============================================================================

#[tokio::test]
async fn test_single_document() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/homepage"))
        .and(query_param("fields[5]", "headline"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": 1, "documentId": "home", "headline": "Welcome"}
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/homepage"))
        .and(body_json(json!({"data": {"headline": "Welcome"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": 1, "documentId": "home", "headline": "Welcome"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/homepage"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let home = <Homepage as SingleDocument>::get(&client).await.unwrap();
    assert_eq!(home.headline, "Welcome");

    let stored = home.put(&client).await.unwrap();
    assert_eq!(stored.meta.document_id.as_deref(), Some("home"));

    <Homepage as SingleDocument>::delete(&client).await.unwrap();
}

// ============================================================================
// Media Tests
// ============================================================================

fn variant(name: &str, width: u32) -> serde_json::Value {
    json!({
        "ext": ".jpg", "url": format!("/uploads/{name}.jpg"), "hash": name,
        "mime": "image/jpeg", "name": name, "path": null,
        "size": 12.5, "width": width, "height": width / 2, "sizeInBytes": 12500
    })
}

fn image_json(formats: serde_json::Value) -> serde_json::Value {
    json!({
        "id": 9, "documentId": "img9",
        "name": "cover.jpg", "alternativeText": null, "caption": null,
        "width": 2000, "height": 1000,
        "formats": formats,
        "hash": "cover", "ext": ".jpg", "mime": "image/jpeg", "size": 320.4,
        "url": "/uploads/cover.jpg", "previewUrl": null,
        "provider": "local", "provider_metadata": null,
        "createdAt": "2024-01-01T00:00:00.000Z",
        "updatedAt": "2024-01-01T00:00:00.000Z"
    })
}

#[test]
fn test_media_largest_format() {
    let image: MediaImageDocument = serde_json::from_value(image_json(json!({
        "thumbnail": variant("thumbnail_cover", 245),
        "small": variant("small_cover", 500),
        "medium": variant("medium_cover", 750)
    })))
    .unwrap();

    assert_eq!(image.meta.id, Some(9));
    assert_eq!(image.largest_format().unwrap().name, "medium_cover");

    let bare: MediaImageDocument = serde_json::from_value(image_json(json!({}))).unwrap();
    assert!(bare.largest_format().is_err());
}

#[tokio::test]
async fn test_media_list() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/upload/files"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            image_json(json!({"large": variant("large_cover", 1000)}))
        ])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let images = MediaImageDocument::list(&client, &DocumentQuery::new())
        .await
        .unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].largest_format().unwrap().width, 1000);
}

#[test]
fn test_media_field_is_populated_wholesale() {
    let query = crate::schema::build(MediaImageDocument::schema());
    assert!(!query.has_populate());

    static POST: Lazy<Schema> = Lazy::new(|| {
        Schema::document("Post")
            .field("cover", FieldType::optional_record(MediaImageDocument::schema))
            .build()
    });
    let query = crate::schema::build(&POST);
    assert_eq!(query.populate_value(), json!({"cover": true}));
}

// ============================================================================
// Webhook Tests
// ============================================================================

#[test]
fn test_webhook_payload() {
    let body = json!({
        "event": "entry.update",
        "createdAt": "2024-03-01T10:00:00.000Z",
        "model": "category",
        "uid": "api::category.category",
        "entry": category_json()
    });

    let payload = WebhookPayload::from_slice(body.to_string().as_bytes()).unwrap();
    assert_eq!(payload.event, WebhookEvent::EntryUpdate);
    assert!(!payload.event.is_media());
    assert!(payload.is_model::<Category>());
    assert!(!payload.is_model::<Article>());

    let category: Category = payload.entry_as().unwrap();
    assert_eq!(category.name, "News");
}

#[test]
fn test_webhook_media_event() {
    let body = json!({
        "event": "media.delete",
        "createdAt": "2024-03-01T10:00:00.000Z"
    });

    let payload: WebhookPayload = serde_json::from_value(body).unwrap();
    assert!(payload.event.is_media());
    assert_eq!(payload.event.to_string(), "media.delete");
    assert!(payload.entry_as::<Category>().is_err());

    assert!(serde_json::from_value::<WebhookPayload>(json!({
        "event": "entry.archive",
        "createdAt": "2024-03-01T10:00:00.000Z"
    }))
    .is_err());
}
