use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use crud_router::{crud_router, MemoryStore, ResourceConfig};
use http_body_util::BodyExt;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Item {
    id: i64,
    name: String,
    #[serde(default)]
    note: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ItemCreate {
    name: String,
    #[serde(default)]
    note: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ItemUpdate {
    name: Option<String>,
    note: Option<String>,
}

fn items_app(page_size: usize) -> Router {
    let config = ResourceConfig::<MemoryStore, Item, ItemCreate, ItemUpdate>::builder()
        .model(Arc::new(MemoryStore::new()))
        .prefix("/items")
        .tag("Items")
        .page_size(page_size)
        .build()
        .unwrap();
    crud_router(config)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

// ── Full lifecycle ──────────────────────────────────────────────────────

#[tokio::test]
async fn item_lifecycle() {
    let app = items_app(10);

    let (status, body) = send(&app, "POST", "/items/", Some(json!({ "name": "First" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["name"], "First");

    let (status, body) = send(&app, "GET", "/items/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.as_array().unwrap().is_empty());

    let (status, body) = send(&app, "GET", "/items/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["name"], "First");

    let (status, body) = send(&app, "PUT", "/items/1", Some(json!({ "name": "Updated" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Updated");

    let (status, body) = send(&app, "DELETE", "/items/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "id": 1, "name": "Updated", "note": null }));

    send(&app, "POST", "/items/", Some(json!({ "name": "Second" }))).await;
    let (status, body) = send(&app, "DELETE", "/items/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = send(&app, "GET", "/items", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn created_record_reads_back_with_assigned_id() {
    let app = items_app(10);
    let (_, created) = send(&app, "POST", "/items", Some(json!({ "name": "Lamp", "note": "blue" }))).await;
    let id = created["id"].as_i64().unwrap();
    let (status, fetched) = send(&app, "GET", &format!("/items/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, json!({ "id": id, "name": "Lamp", "note": "blue" }));
}

#[tokio::test]
async fn create_ignores_client_supplied_id() {
    let app = items_app(10);
    let (status, body) = send(&app, "POST", "/items", Some(json!({ "id": 77, "name": "A" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
}

// ── Not found ───────────────────────────────────────────────────────────

#[tokio::test]
async fn unknown_id_is_404_for_every_member_route() {
    let app = items_app(10);
    for (method, body) in [
        ("GET", None),
        ("PUT", Some(json!({ "name": "x" }))),
        ("PATCH", Some(json!({ "name": "x" }))),
        ("DELETE", None),
    ] {
        let (status, body) = send(&app, method, "/items/404", body).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", method);
        assert_eq!(body, json!({ "statusCode": 404, "detail": "Item not found" }));
    }
}

#[tokio::test]
async fn second_delete_is_404() {
    let app = items_app(10);
    send(&app, "POST", "/items", Some(json!({ "name": "A" }))).await;
    let (status, _) = send(&app, "DELETE", "/items/1", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", "/items/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "DELETE", "/items/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_all_is_idempotent() {
    let app = items_app(10);
    for name in ["a", "b", "c"] {
        send(&app, "POST", "/items", Some(json!({ "name": name }))).await;
    }
    for _ in 0..2 {
        let (status, body) = send(&app, "DELETE", "/items", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }
    let (_, body) = send(&app, "GET", "/items", None).await;
    assert_eq!(body, json!([]));
}

// ── Update semantics ────────────────────────────────────────────────────

#[tokio::test]
async fn patch_merges_fields() {
    let app = items_app(10);
    send(&app, "POST", "/items", Some(json!({ "name": "A", "note": "keep" }))).await;

    let (status, body) = send(&app, "PATCH", "/items/1", Some(json!({ "name": "B" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "id": 1, "name": "B", "note": "keep" }));

    let (_, body) = send(&app, "PUT", "/items/1", Some(json!({ "note": "changed", "id": 9 }))).await;
    assert_eq!(body, json!({ "id": 1, "name": "B", "note": "changed" }));
}

#[tokio::test]
async fn null_in_update_keeps_stored_value() {
    let app = items_app(10);
    send(&app, "POST", "/items", Some(json!({ "name": "A", "note": "keep" }))).await;
    let (status, body) = send(&app, "PATCH", "/items/1", Some(json!({ "note": null }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["note"], "keep");
}

// ── Pagination ──────────────────────────────────────────────────────────

async fn seeded(count: usize, page_size: usize) -> Router {
    let app = items_app(page_size);
    for i in 1..=count {
        send(&app, "POST", "/items", Some(json!({ "name": format!("item-{}", i) }))).await;
    }
    app
}

fn names(body: &Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn list_defaults_to_page_size() {
    let app = seeded(15, 10).await;
    let (_, body) = send(&app, "GET", "/items", None).await;
    assert_eq!(body.as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn limit_returns_at_most_n() {
    let app = seeded(15, 10).await;
    let (_, body) = send(&app, "GET", "/items?skip=0&limit=4", None).await;
    assert_eq!(names(&body), vec!["item-1", "item-2", "item-3", "item-4"]);
}

#[tokio::test]
async fn limit_above_page_size_returns_everything() {
    let app = seeded(15, 10).await;
    let (_, body) = send(&app, "GET", "/items?limit=100", None).await;
    assert_eq!(body.as_array().unwrap().len(), 15);
}

#[tokio::test]
async fn skip_follows_insertion_order() {
    let app = seeded(15, 10).await;
    let (_, body) = send(&app, "GET", "/items?skip=12", None).await;
    assert_eq!(names(&body), vec!["item-13", "item-14", "item-15"]);
    let (_, body) = send(&app, "GET", "/items?skip=40", None).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn page_parameter_selects_a_window() {
    let app = seeded(15, 10).await;
    let (_, body) = send(&app, "GET", "/items?page=1&limit=5", None).await;
    assert_eq!(names(&body), vec!["item-6", "item-7", "item-8", "item-9", "item-10"]);
}

#[tokio::test]
async fn invalid_window_is_422() {
    let app = items_app(10);
    for uri in ["/items?skip=-1", "/items?limit=0", "/items?limit=abc", "/items?skip=1&page=1"] {
        let (status, body) = send(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", uri);
        assert_eq!(body["statusCode"], 422);
    }
}
