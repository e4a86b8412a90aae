//! API module
//!
//! HTTP endpoints, middleware, and shared request-handling types.

pub mod middleware;
pub mod routes;

use axum::extract::FromRequest;
use sqlx::PgPool;

use crate::auth::AuthService;
use crate::error::AppError;

pub use routes::create_router;

/// Shared state handed to every route handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub auth: AuthService,
}

impl AppState {
    pub fn new(pool: PgPool, auth: AuthService) -> Self {
        Self { pool, auth }
    }
}

/// JSON extractor whose rejection uses the uniform error envelope instead of
/// axum's plain-text bodies.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
