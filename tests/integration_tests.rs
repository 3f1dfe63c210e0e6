use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use users_api::config::HttpConfig;
use users_api::infrastructure::memory::InMemoryUserStore;

fn create_test_app() -> Router {
    users_api::build_app(Arc::new(InMemoryUserStore::new()), &HttpConfig::default())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_user(app: &Router, name: &str, age: i64) -> Value {
    let (status, body) = send_json(
        app,
        Method::POST,
        "/users",
        Some(json!({"user": {"name": name, "age": age}})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

#[tokio::test]
async fn test_create_and_show_user() {
    let app = create_test_app();

    let created = create_user(&app, "Ada", 30).await;
    assert_eq!(created["id"], 1);
    assert_eq!(created["name"], "Ada");
    assert_eq!(created["age"], 30);
    assert!(created["created_at"].is_string());

    let (status, fetched) = send_json(&app, Method::GET, "/users/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_index_lists_all_users() {
    let app = create_test_app();

    let (status, body) = send_json(&app, Method::GET, "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    create_user(&app, "Ada", 30).await;
    create_user(&app, "Grace", 45).await;

    let (status, body) = send_json(&app, Method::GET, "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Ada", "Grace"]);
}

#[tokio::test]
async fn test_missing_ids_are_not_found() {
    let app = create_test_app();
    let update = Some(json!({"user": {"age": 31}}));

    let (status, body) = send_json(&app, Method::GET, "/users/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
    assert_eq!(body["code"], 404);

    let (status, _) = send_json(&app, Method::PUT, "/users/999", update.clone()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(&app, Method::PATCH, "/users/999", update).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(&app, Method::DELETE, "/users/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(&app, Method::GET, "/users/not-a-number", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_partial_update_keeps_omitted_fields() {
    let app = create_test_app();
    let created = create_user(&app, "Ada", 30).await;

    let (status, updated) = send_json(
        &app,
        Method::PATCH,
        "/users/1",
        Some(json!({"user": {"age": 31}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["name"], "Ada");
    assert_eq!(updated["age"], 31);

    let (status, updated) = send_json(
        &app,
        Method::PUT,
        "/users/1",
        Some(json!({"user": {"name": "Ada Lovelace"}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Ada Lovelace");
    assert_eq!(updated["age"], 31);
}

#[tokio::test]
async fn test_extra_fields_are_ignored() {
    let app = create_test_app();

    let (status, created) = send_json(
        &app,
        Method::POST,
        "/users",
        Some(json!({"user": {"name": "Ada", "age": 30, "is_admin": true, "id": 500}})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);
    assert!(created.get("is_admin").is_none());

    let (status, updated) = send_json(
        &app,
        Method::PUT,
        "/users/1",
        Some(json!({"user": {"is_admin": true, "id": 77}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], 1);
    assert_eq!(updated["name"], "Ada");
    assert_eq!(updated["age"], 30);
    assert!(updated.get("is_admin").is_none());

    let (status, _) = send_json(&app, Method::GET, "/users/77", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_destroy_is_durable() {
    let app = create_test_app();
    create_user(&app, "Ada", 30).await;

    let (status, body) = send(&app, Method::DELETE, "/users/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let (status, _) = send_json(&app, Method::GET, "/users/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(&app, Method::DELETE, "/users/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_user_wrapper_is_bad_request() {
    let app = create_test_app();

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/users",
        Some(json!({"name": "Ada", "age": 30})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "MISSING_PARAMETER");

    create_user(&app, "Ada", 30).await;
    let (status, body) = send_json(&app, Method::PUT, "/users/1", Some(json!({"age": 31}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "MISSING_PARAMETER");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = create_test_app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/users")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"user\": "))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_validation_errors() {
    let app = create_test_app();

    for body in [
        json!({"user": {"name": "Ada"}}),
        json!({"user": {"name": "   ", "age": 30}}),
        json!({"user": {"name": "Ada", "age": 200}}),
        json!({"user": {"name": "Ada", "age": "thirty"}}),
    ] {
        let (status, response) = send_json(&app, Method::POST, "/users", Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response["error"], "VALIDATION_ERROR");
    }

    let (_, users) = send_json(&app, Method::GET, "/users", None).await;
    assert_eq!(users, json!([]));
}

#[tokio::test]
async fn test_easter_egg() {
    let app = create_test_app();

    let (status, body) = send(&app, Method::GET, "/our-custom-route", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"\"this is a custom response\"");
}

#[tokio::test]
async fn test_random_user() {
    let app = create_test_app();

    let (status, body) = send_json(&app, Method::GET, "/random-user", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "EMPTY_COLLECTION");

    for (name, age) in [("a", 1), ("b", 2), ("c", 3)] {
        create_user(&app, name, age).await;
    }

    let mut counts: HashMap<i64, usize> = HashMap::new();
    for _ in 0..600 {
        let (status, user) = send_json(&app, Method::GET, "/random-user", None).await;
        assert_eq!(status, StatusCode::OK);
        *counts.entry(user["id"].as_i64().unwrap()).or_default() += 1;
    }

    assert_eq!(counts.len(), 3);
    for count in counts.values() {
        assert!((100..=300).contains(count), "skewed count: {}", count);
    }
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app();
    create_user(&app, "Ada", 30).await;

    let (status, body) = send_json(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"]["type"], "in-memory");
    assert_eq!(body["storage"]["users_count"], 1);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = create_test_app();

    let (status, _) = send(&app, Method::GET, "/posts", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_explicit_null_update_is_rejected() {
    let app = create_test_app();
    create_user(&app, "Ada", 30).await;

    for body in [
        json!({"user": {"name": null}}),
        json!({"user": {"name": null, "age": null}}),
        json!({"user": {"age": null}}),
    ] {
        let (status, response) = send_json(&app, Method::PATCH, "/users/1", Some(body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(response["error"], "VALIDATION_ERROR");
    }

    let (status, user) = send_json(&app, Method::GET, "/users/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["name"], "Ada");
    assert_eq!(user["age"], 30);
}

#[tokio::test]
async fn test_error_request_id_matches_response_header() {
    let app = create_test_app();

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/users/999").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let header_id = response
        .headers()
        .get("x-request-id")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["request_id"], header_id.as_str());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/random-user")
                .header("x-request-id", "trace-abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "trace-abc-123");
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["request_id"], "trace-abc-123");
}

#[tokio::test]
async fn test_error_messages_are_english() {
    let app = create_test_app();

    let (_, body) = send_json(&app, Method::GET, "/users/999", None).await;
    assert_eq!(body["message"], "User 999 not found");

    let (_, body) = send_json(&app, Method::GET, "/random-user", None).await;
    assert_eq!(body["message"], "There are no users to pick from");

    let (_, body) = send_json(&app, Method::POST, "/users", Some(json!({"user": {"name": "Ada"}}))).await;
    assert_eq!(body["message"], "age can't be blank");

    let (_, body) = send_json(&app, Method::POST, "/users", Some(json!({"name": "Ada"}))).await;
    assert_eq!(body["message"], "param is missing or the value is empty: user");
}
