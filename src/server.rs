//! HTTP server initialization and runtime setup.
//!
//! Handles the store connection, service wiring and the Axum server lifecycle.

use crate::config::Config;
use crate::domain::repositories::{UrlRepository, UserRepository};
use crate::infrastructure::memory::{InMemoryUrlRepository, InMemoryUserRepository};
use crate::infrastructure::persistence::{PgUrlRepository, PgUserRepository};
use crate::infrastructure::run_migrations;
use crate::routes::app_router;
use crate::state::AppState;
use crate::utils::code_generator::{CodeGenerator, RandomCodeGenerator};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool and migrations, or the in-memory store
/// - Code generator, URL and auth services
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let (url_repository, user_repository) = build_repositories(&config).await?;

    let generator: Arc<dyn CodeGenerator> =
        Arc::new(RandomCodeGenerator::new(config.short_code_length));

    let state = AppState::new(
        url_repository,
        user_repository,
        generator,
        &config.base_url,
        &config.jwt_secret,
        config.token_ttl_seconds,
    );

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}

async fn build_repositories(
    config: &Config,
) -> Result<(Arc<dyn UrlRepository>, Arc<dyn UserRepository>)> {
    let Some(ref database_url) = config.database_url else {
        tracing::warn!("No database configured; using the in-memory store (data is not persisted)");
        return Ok((
            Arc::new(InMemoryUrlRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
        ));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Migrations applied");

    let pool = Arc::new(pool);

    Ok((
        Arc::new(PgUrlRepository::new(pool.clone())),
        Arc::new(PgUserRepository::new(pool)),
    ))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
