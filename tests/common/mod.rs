//! Common test utilities

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::util::ServiceExt;

use ironbank::api::{create_router, AppState};
use ironbank::auth::AuthService;
use ironbank::domain::Account;
use ironbank::store::AccountStore;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";
pub const ADMIN_PASSWORD: &str = "admin_pw_123";

/// Connect to the test database, ensure the schema, and seed a fresh admin
/// account for this test. Each test gets its own admin (random account
/// number), so tests stay independent without truncating shared tables.
pub async fn setup() -> (Router, PgPool, Account) {
    dotenvy::dotenv().ok();
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    ironbank::db::init_schema(&pool)
        .await
        .expect("Failed to init schema");

    let store = AccountStore::new(pool.clone());
    let admin = Account::new("Test", "Admin", ADMIN_PASSWORD, 0).expect("Failed to build admin");
    let admin = store
        .create(admin, true)
        .await
        .expect("Failed to seed admin account");

    let state = AppState::new(pool.clone(), AuthService::new(TEST_JWT_SECRET, 3600));

    (create_router(state), pool, admin)
}

/// Fire one request at the router and decode the JSON response body.
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("x-jwt-token", token);
    }

    let request = match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    (status, value)
}

/// Login and return the issued token.
pub async fn login(app: &Router, number: i64, password: &str) -> String {
    let (status, body) = send_json(
        app,
        "POST",
        "/login",
        None,
        Some(serde_json::json!({"number": number, "password": password})),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    assert_eq!(body["number"], number);

    body["token"].as_str().expect("token missing").to_string()
}

/// Create an account through the API and return its response body.
pub async fn create_account(
    app: &Router,
    admin_token: &str,
    first: &str,
    last: &str,
    password: &str,
    balance: i64,
) -> Value {
    let (status, body) = send_json(
        app,
        "POST",
        "/account",
        Some(admin_token),
        Some(serde_json::json!({
            "firstName": first,
            "lastName": last,
            "password": password,
            "balance": balance,
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "account creation failed: {body}");

    body
}

/// Fetch an account by id with an admin token.
pub async fn get_account(app: &Router, admin_token: &str, id: i64) -> (StatusCode, Value) {
    send_json(app, "GET", &format!("/account/{id}"), Some(admin_token), None).await
}
