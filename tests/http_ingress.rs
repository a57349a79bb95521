//! HTTP ingress tests
//!
//! Drives the router in-process: POST and GET on the GraphQL endpoint,
//! status code mapping, the GraphiQL page, and the health check.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use hobbygraph::api::ApiHandler;
use hobbygraph::http_server::{HttpServer, HttpServerConfig};
use hobbygraph::schema::{Schema, SchemaOptions};
use hobbygraph::storage::MemoryStore;
use serde_json::{json, Value};
use tower::ServiceExt;

// =============================================================================
// Test Utilities
// =============================================================================

fn router() -> Router {
    router_with(HttpServerConfig::default())
}

fn router_with(config: HttpServerConfig) -> Router {
    let schema = Schema::build(SchemaOptions::default()).unwrap();
    let handler = ApiHandler::new(schema, Arc::new(MemoryStore::new()));
    HttpServer::new(config, handler).router()
}

fn encode(raw: &str) -> String {
    raw.bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{:02X}", b),
        })
        .collect()
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, _, body) = send_raw(router, request).await;
    (status, serde_json::from_slice(body.as_bytes()).unwrap())
}

async fn send_raw(router: &Router, request: Request<Body>) -> (StatusCode, String, String) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
}

fn post(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/graphql")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

fn get(uri: String) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn browser_get(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::ACCEPT, "text/html,application/xhtml+xml,*/*;q=0.8")
        .body(Body::empty())
        .unwrap()
}

// =============================================================================
// POST
// =============================================================================

#[tokio::test]
async fn test_post_mutation_then_query() {
    let router = router();

    let body = json!({
        "query": "mutation($name: String!) { createUser(name: $name, age: 30, profession: \"Engineer\") { name } }",
        "variables": {"name": "Ann"},
    });
    let (status, response) = send(&router, post(body.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({"data": {"createUser": {"name": "Ann"}}}));

    let body = json!({"query": "{ users { name } }"});
    let (status, response) = send(&router, post(body.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({"data": {"users": [{"name": "Ann"}]}}));
}

#[tokio::test]
async fn test_post_field_error_is_still_ok() {
    let body = json!({"query": "{ users { id } usres { id } }"});
    let (status, response) = send(&router(), post(body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["data"], json!({"users": [], "usres": null}));
    assert_eq!(response["errors"][0]["path"], json!(["usres"]));
}

#[tokio::test]
async fn test_post_malformed_body() {
    let (status, response) = send(&router(), post("{not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["data"], Value::Null);
    assert!(response["errors"][0]["message"].is_string());
}

#[tokio::test]
async fn test_post_syntax_error() {
    let body = json!({"query": "{ users { id "});
    let (status, response) = send(&router(), post(body.to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["errors"][0]["extensions"]["code"], "GRAPHQL_PARSE_FAILED");
}

// =============================================================================
// GET
// =============================================================================

#[tokio::test]
async fn test_get_query() {
    let uri = format!("/graphql?query={}", encode("{ users { id } }"));
    let (status, response) = send(&router(), get(uri)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({"data": {"users": []}}));
}

#[tokio::test]
async fn test_get_query_with_variables() {
    let uri = format!(
        "/graphql?query={}&variables={}",
        encode("query($id: ID!) { user(id: $id) { id } }"),
        encode(r#"{"id": "42"}"#)
    );
    let (status, response) = send(&router(), get(uri)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({"data": {"user": null}}));
}

#[tokio::test]
async fn test_get_mutation_is_rejected() {
    let uri = format!(
        "/graphql?query={}",
        encode(r#"mutation { deleteUser(id: "1") { id } }"#)
    );
    let (status, response) = send(&router(), get(uri)).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response["data"], Value::Null);
}

#[tokio::test]
async fn test_get_without_query() {
    let (status, _) = send(&router(), get("/graphql".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// GraphiQL and introspection
// =============================================================================

#[tokio::test]
async fn test_browser_get_serves_graphiql() {
    let (status, content_type, body) = send_raw(&router(), browser_get("/graphql")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("text/html"), "{}", content_type);
    assert!(body.contains("graphiql"));
    assert!(body.contains(r#"url: "/graphql""#));
}

#[tokio::test]
async fn test_browser_get_with_query_executes_it() {
    let uri = format!("/graphql?query={}", encode("{ users { id } }"));
    let (status, content_type, body) = send_raw(&router(), browser_get(&uri)).await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.starts_with("application/json"));
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({"data": {"users": []}})
    );
}

#[tokio::test]
async fn test_graphiql_can_be_disabled() {
    let config = HttpServerConfig {
        graphiql: false,
        ..HttpServerConfig::default()
    };
    let (status, content_type, _) = send_raw(&router_with(config), browser_get("/graphql")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(content_type.starts_with("application/json"));
}

#[tokio::test]
async fn test_post_introspection_query() {
    let body = json!({
        "query": "{ __schema { queryType { name } mutationType { name } } __type(name: \"Hobby\") { kind fields { name } } }"
    });
    let (status, response) = send(&router(), post(body.to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        response,
        json!({"data": {
            "__schema": {"queryType": {"name": "RootQueryType"}, "mutationType": {"name": "Mutation"}},
            "__type": {"kind": "OBJECT", "fields": [
                {"name": "id"}, {"name": "title"}, {"name": "description"},
                {"name": "userId"}, {"name": "user"}
            ]}
        }})
    );
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health() {
    let (status, response) = send(&router(), get("/health".to_string())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "ok");
    assert_eq!(response["version"], env!("CARGO_PKG_VERSION"));
}
