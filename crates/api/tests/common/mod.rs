//! Shared helpers for HTTP-level integration tests.
//!
//! Builds the full application router (same middleware stack as `main.rs`)
//! against a `#[sqlx::test]`-provisioned database, plus request helpers and
//! auth bootstrap utilities.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use upkeep_api::auth::jwt::JwtConfig;
use upkeep_api::config::ServerConfig;
use upkeep_api::routes;
use upkeep_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough-for-hmac".to_string(),
            token_expiry_days: 7,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();

    let state = AppState {
        pool,
        config: Arc::new(config),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:3000".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> Response {
    send(app, Method::GET, uri, token, None).await
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response {
    send(app, Method::POST, uri, token, Some(body)).await
}

/// POST without a body (action endpoints like synchronize).
pub async fn post(app: &Router, uri: &str, token: Option<&str>) -> Response {
    send(app, Method::POST, uri, token, None).await
}

pub async fn put_json(
    app: &Router,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response {
    send(app, Method::PUT, uri, token, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str, token: Option<&str>) -> Response {
    send(app, Method::DELETE, uri, token, None).await
}

/// Consume a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
}

// ---------------------------------------------------------------------------
// Auth bootstrap
// ---------------------------------------------------------------------------

/// Run first-time setup through the API, returning the admin's token.
pub async fn bootstrap_admin(app: &Router) -> String {
    let response = post_json(
        app,
        "/api/v1/auth/setup",
        None,
        serde_json::json!({
            "name": "Admin User",
            "email": "admin@example.com",
            "password": "admin-password",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED, "setup should succeed");

    let json = body_json(response).await;
    json["token"].as_str().expect("setup returns a token").to_string()
}

/// Register an engineer via the admin token and log them in, returning the
/// engineer's token.
pub async fn bootstrap_engineer(app: &Router, admin_token: &str) -> String {
    let response = post_json(
        app,
        "/api/v1/auth/register",
        Some(admin_token),
        serde_json::json!({
            "name": "Engineer User",
            "email": "engineer@example.com",
            "password": "engineer-password",
            "role": "engineer",
        }),
    )
    .await;
    assert_eq!(
        response.status(),
        StatusCode::CREATED,
        "engineer registration should succeed"
    );

    let response = post_json(
        app,
        "/api/v1/auth/login",
        None,
        serde_json::json!({
            "email": "engineer@example.com",
            "password": "engineer-password",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "engineer login should succeed");

    let json = body_json(response).await;
    json["token"].as_str().expect("login returns a token").to_string()
}

// ---------------------------------------------------------------------------
// Entity fixtures
// ---------------------------------------------------------------------------

/// Create a site and return its id.
pub async fn create_site(app: &Router, token: &str, name: &str) -> i64 {
    let response = post_json(
        app,
        "/api/v1/sites",
        Some(token),
        serde_json::json!({ "name": name, "location": "Test Valley" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

/// Create a machine of the given type and return its id.
pub async fn create_machine(
    app: &Router,
    token: &str,
    site_id: i64,
    name: &str,
    machine_type: &str,
) -> i64 {
    let response = post_json(
        app,
        "/api/v1/machines",
        Some(token),
        serde_json::json!({
            "name": name,
            "siteId": site_id,
            "desiredDailyHours": 8,
            "machineType": machine_type,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

/// Create a task template and return its id.
pub async fn create_template(
    app: &Router,
    token: &str,
    task: &str,
    machine_type: &str,
    priority: &str,
    frequency: &str,
) -> i64 {
    let response = post_json(
        app,
        "/api/v1/task-templates",
        Some(token),
        serde_json::json!({
            "task": task,
            "priority": priority,
            "frequency": frequency,
            "machineType": machine_type,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

/// List a machine's tasks via the API.
pub async fn machine_tasks(app: &Router, token: &str, machine_id: i64) -> Vec<serde_json::Value> {
    let response = get(
        app,
        &format!("/api/v1/maintenance-tasks?machineId={machine_id}"),
        Some(token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await.as_array().unwrap().clone()
}
