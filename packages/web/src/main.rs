use std::sync::Arc;

use anyhow::Context as _;
use api::db::{self, SqlStore};
use api::{AppState, Settings};
use tower_sessions_sqlx_store::SqliteStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,api=debug")),
        )
        .init();

    let settings = Settings::new().context("Failed to load settings")?;

    // Initialize database pool
    let pool = db::connect(&settings.database)
        .await
        .context("Failed to connect to database")?;

    // Run migrations
    db::migrate(&pool)
        .await
        .context("Failed to run migrations")?;

    // Create session store
    let session_store = SqliteStore::new(pool.clone());
    session_store
        .migrate()
        .await
        .context("Failed to create session table")?;

    let state = AppState::new(Arc::new(SqlStore::new(pool)))
        .context("Failed to compile templates")?;
    let router = api::router(
        state,
        api::session_layer(session_store, &settings.session),
    );

    let addr = settings.server.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router).await?;
    Ok(())
}
