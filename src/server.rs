//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, record store selection, background session
//! cleanup, and Axum server lifecycle.

use crate::application::services::AuthService;
use crate::config::{Config, DataSource, DatabaseConfig};
use crate::infrastructure::persistence::{
    PgBuildingRepository, PgResidentRepository, PgSessionRepository, PgUserRepository,
};
use crate::infrastructure::drafts::ReorderDrafts;
use crate::infrastructure::rendering::HtmlDocumentRenderer;
use crate::infrastructure::spreadsheet::SpreadsheetSource;
use crate::routes::app_router;
use crate::state::{AppState, RecordStore, SessionSettings};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Opens the PostgreSQL pool with the configured limits.
pub async fn connect_pool(database: &DatabaseConfig) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(database.max_connections)
        .acquire_timeout(Duration::from_secs(database.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(database.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(database.max_lifetime_secs))
        .connect(&database.url)
        .await
        .context("Failed to connect to database")
}

fn record_store(config: &Config, pool: &Arc<PgPool>) -> Result<RecordStore> {
    match config.data_source {
        DataSource::Postgres => Ok(RecordStore {
            buildings: Arc::new(PgBuildingRepository::new(pool.clone())),
            residents: Arc::new(PgResidentRepository::new(pool.clone())),
            read_only: false,
        }),
        DataSource::Spreadsheet => {
            let source = Arc::new(SpreadsheetSource::new(config.spreadsheet_sources.clone())?);
            Ok(RecordStore {
                buildings: source.clone(),
                residents: source,
                read_only: true,
            })
        }
    }
}

async fn purge_sessions(auth: Arc<AuthService>) {
    let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);
    loop {
        interval.tick().await;
        if let Err(e) = auth.purge_expired_sessions().await {
            tracing::warn!(error = %e, "Failed to purge expired sessions");
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Record store (PostgreSQL or read-only spreadsheet)
/// - Background purge of expired sessions
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - The spreadsheet client cannot be built
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_pool(&config.database).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to migrate")?;

    let pool = Arc::new(pool);
    let drafts = Arc::new(ReorderDrafts::new());
    let auth = Arc::new(
        AuthService::new(
            Arc::new(PgUserRepository::new(pool.clone())),
            Arc::new(PgSessionRepository::new(pool.clone())),
            config.session_signing_secret.clone(),
            config.session_ttl_minutes,
        )
        .with_reorder_drafts(drafts.clone()),
    );

    tokio::spawn(purge_sessions(auth.clone()));
    tracing::info!("Session cleanup started");

    let state = AppState::new(
        auth,
        record_store(&config, &pool)?,
        Arc::new(HtmlDocumentRenderer::new()),
        config.label_layout(),
        SessionSettings {
            ttl_seconds: config.session_ttl_minutes * 60,
            secure_cookies: config.secure_cookies,
        },
        drafts,
    );

    let app = app_router(state, config.behind_proxy)?;

    let listener = tokio::net::TcpListener::bind(config.listen_addr.as_str())
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}
