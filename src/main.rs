//! ironbank - toy banking JSON API
//!
//! Accounts, login, balance transfers, and admin-gated account management
//! over PostgreSQL.

use std::net::SocketAddr;

use sqlx::postgres::PgPoolOptions;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ironbank::api::{self, AppState};
use ironbank::auth::AuthService;
use ironbank::domain::Account;
use ironbank::store::AccountStore;
use ironbank::{db, Config};

/// Initialize tracing/logging
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ironbank=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Create the bootstrap admin account. Account creation is admin-gated, so
/// the first admin has to come from here.
async fn seed_admin(store: &AccountStore) -> anyhow::Result<()> {
    let password =
        std::env::var("SEED_ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string());

    let account = Account::new("Bank", "Admin", &password, 0)?;
    let account = store.create(account, true).await?;

    tracing::info!(
        id = account.id,
        number = account.number,
        "seeded admin account"
    );

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing();

    let config = Config::from_env()?;
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    tracing::info!("Starting ironbank server");
    tracing::info!("Connecting to database...");

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;

    db::verify_connection(&pool).await?;
    db::init_schema(&pool).await?;

    tracing::info!("Database connected, schema ready");

    if std::env::args().any(|arg| arg == "--seed") {
        tracing::info!("Seeding the database");
        seed_admin(&AccountStore::new(pool.clone())).await?;
    }

    let auth = AuthService::new(config.jwt_secret, config.token_ttl_seconds);
    let state = AppState::new(pool.clone(), auth);

    let app = api::create_router(state).layer(TraceLayer::new_for_http());

    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutting down...");
    pool.close().await;
    tracing::info!("Database connections closed. Goodbye!");

    Ok(())
}

/// Shutdown signal handler for graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}
