//! End-to-end HTTP flow through the full router, backed by in-memory SQLite.

use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use users_service::api::create_router;
use users_service::api::middleware::REQUEST_ID_HEADER;
use users_service::config::Settings;
use users_service::server::prepare;

async fn app() -> Router {
    let settings = Settings::default();
    let state = prepare(&settings).await.expect("startup should succeed");
    create_router(state, Duration::from_secs(5))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn login(app: &Router, email: &str, password: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await
}

async fn token_for(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = login(app, email, password).await;
    assert_eq!(status, StatusCode::OK, "login failed: {}", body);
    body["token"].as_str().unwrap().to_string()
}

async fn register_test_user(app: &Router) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/register",
        None,
        Some(json!({
            "username": "testuser",
            "email": "test@example.com",
            "password": "pw123"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    body
}

#[tokio::test]
async fn user_lifecycle() {
    let app = app().await;

    let user = register_test_user(&app).await;
    assert_eq!(user["username"], "testuser");
    assert_eq!(user["email"], "test@example.com");
    assert!(user["role_id"].is_null());
    assert!(user.get("hashed_password").is_none());

    let (status, body) = login(&app, "test@example.com", "pw123").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 24 * 3600);
    assert_eq!(body["user"]["id"], user["id"]);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, profile) = send(&app, Method::GET, "/user/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["email"], "test@example.com");

    let (status, updated) = send(
        &app,
        Method::PUT,
        "/user/profile",
        Some(&token),
        Some(json!({ "username": "updateduser", "email": "updated@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["username"], "updateduser");
    assert_eq!(updated["email"], "updated@example.com");

    let (status, body) = send(
        &app,
        Method::POST,
        "/user/change-password",
        Some(&token),
        Some(json!({ "old_password": "pw123", "new_password": "newpw123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (status, _) = login(&app, "updated@example.com", "pw123").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let token = token_for(&app, "updated@example.com", "newpw123").await;

    // Regular users are authenticated but not authorized for admin routes
    for (method, uri) in [
        (Method::GET, "/users"),
        (Method::GET, "/roles"),
        (Method::DELETE, "/users/1"),
    ] {
        let (status, body) = send(&app, method, uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{}", uri);
        assert_eq!(body["code"], "FORBIDDEN");
    }
}

#[tokio::test]
async fn authentication_failures() {
    let app = app().await;
    register_test_user(&app).await;

    let (status, body) = send(&app, Method::GET, "/user/profile", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = send(&app, Method::GET, "/user/profile", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Unknown email and wrong password are indistinguishable
    let (status, unknown) = login(&app, "nobody@example.com", "pw123").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, wrong) = login(&app, "test@example.com", "wrong").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown["message"], wrong["message"]);

    let token = token_for(&app, "test@example.com", "pw123").await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/user/change-password",
        Some(&token),
        Some(json!({ "old_password": "wrong", "new_password": "newpw123" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn registration_validation_and_conflicts() {
    let app = app().await;
    register_test_user(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/register",
        None,
        Some(json!({ "username": "other", "email": "test@example.com", "password": "pw123" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "DUPLICATE");

    for payload in [
        json!({ "username": "ab", "email": "short@example.com", "password": "pw123" }),
        json!({ "username": "valid", "email": "not-an-email", "password": "pw123" }),
        json!({ "username": "valid", "email": "pw@example.com", "password": "pw" }),
    ] {
        let (status, body) = send(&app, Method::POST, "/register", None, Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    let (status, _) = send(&app, Method::POST, "/register", None, Some(json!({ "username": 1 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Taking another user's email through the profile is a conflict too
    send(
        &app,
        Method::POST,
        "/register",
        None,
        Some(json!({ "username": "second", "email": "second@example.com", "password": "pw123" })),
    )
    .await;
    let token = token_for(&app, "second@example.com", "pw123").await;
    let (status, _) = send(
        &app,
        Method::PUT,
        "/user/profile",
        Some(&token),
        Some(json!({ "email": "test@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn seeded_admin_manages_users() {
    let app = app().await;
    let user = register_test_user(&app).await;
    let user_id = user["id"].as_i64().unwrap();

    let admin_token = token_for(&app, "admin@example.com", "adminpass").await;

    let (status, users) = send(&app, Method::GET, "/users", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().unwrap().len(), 2);

    let (status, roles) = send(&app, Method::GET, "/roles", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let roles = roles.as_array().unwrap();
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0]["name"], "admin");
    let admin_role_id = roles[0]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/users/{}/assign-role", user_id),
        Some(&admin_token),
        Some(json!({ "role_id": "999" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    // Numeric strings are accepted for role_id
    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/users/{}/assign-role", user_id),
        Some(&admin_token),
        Some(json!({ "role_id": admin_role_id.to_string() })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role_id"], admin_role_id);

    // Promotion takes effect on the existing token
    let user_token = token_for(&app, "test@example.com", "pw123").await;
    let (status, _) = send(&app, Method::GET, "/roles", Some(&user_token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/users/{}/reset-password", user_id),
        Some(&admin_token),
        Some(json!({ "new_password": "resetpw" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = login(&app, "test@example.com", "pw123").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    token_for(&app, "test@example.com", "resetpw").await;

    let uri = format!("/users/{}", user_id);
    let (status, body) = send(&app, Method::DELETE, &uri, Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The deleted user's token is still signed but the account is gone
    let (status, _) = send(&app, Method::GET, "/user/profile", Some(&user_token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_and_openapi() {
    let app = app().await;

    let (status, health) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["database"]["status"], "healthy");

    let (status, doc) = send(&app, Method::GET, "/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let paths = doc["paths"].as_object().unwrap();
    for path in [
        "/health",
        "/register",
        "/login",
        "/user/profile",
        "/user/change-password",
        "/users",
        "/users/{id}",
        "/users/{id}/assign-role",
        "/users/{id}/reset-password",
        "/roles",
    ] {
        assert!(paths.contains_key(path), "missing {}", path);
    }
    assert!(doc["components"]["securitySchemes"]["bearerAuth"].is_object());
}

#[tokio::test]
async fn unmatched_requests_get_json_errors() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/does-not-exist", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    assert!(body["request_id"].is_string());

    let (status, body) = send(&app, Method::PUT, "/health", None, None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["code"], "METHOD_NOT_ALLOWED");

    // Route layers authenticate before the method is matched
    let (status, body) = send(&app, Method::PUT, "/users/1", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn request_id_is_propagated() {
    let app = app().await;

    let request = Request::builder()
        .uri("/health")
        .header(REQUEST_ID_HEADER, "trace-me-123")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(
        response.headers().get(REQUEST_ID_HEADER).unwrap(),
        "trace-me-123"
    );

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));
}
