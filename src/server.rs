//! HTTP server initialization and runtime setup.
//!
//! Handles store selection, migrations, throttler housekeeping, and the Axum
//! server lifecycle including graceful shutdown.

use crate::application::services::{Throttler, UrlService};
use crate::config::Config;
use crate::domain::repositories::UrlRepository;
use crate::error::expose_internal_details;
use crate::infrastructure::persistence::{MemoryUrlRepository, PgUrlRepository};
use crate::routes::app_router;
use crate::state::{AppState, PublicSite};

use anyhow::{Context, Result};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

/// Connection attempts made before startup fails.
const CONNECT_ATTEMPTS: usize = 5;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Error detail exposure (`APP_ENV`)
/// - URL store (PostgreSQL with migrations, or in-memory)
/// - Throttler with a background pruning task
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    expose_internal_details(config.is_development());

    let (repository, pool) = open_store(&config).await?;

    let throttler = Arc::new(Throttler::new(
        config.throttle_policy(),
        config.behind_proxy,
    ));
    spawn_throttle_pruner(throttler.clone());

    let addr = config.listen_socket_addr()?;
    let site = PublicSite::new(
        config.public_scheme.clone(),
        config.public_domain.clone(),
        addr.port(),
    );

    let url_service = Arc::new(UrlService::new(repository));
    let state = AppState::new(url_service, throttler, site);

    let app = app_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("Database pool closed");
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Builds the configured repository. The pool is returned for shutdown.
async fn open_store(config: &Config) -> Result<(Arc<dyn UrlRepository>, Option<PgPool>)> {
    if config.uses_memory_store() {
        tracing::warn!("Using in-memory store; records are lost on restart");
        return Ok((Arc::new(MemoryUrlRepository::new()), None));
    }

    let pool = connect_with_retry(config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Migrations applied");

    let repository = PgUrlRepository::new(Arc::new(pool.clone()), config.store_timeout());
    Ok((Arc::new(repository), Some(pool)))
}

/// Opens the connection pool, retrying with jittered exponential backoff.
async fn connect_with_retry(config: &Config) -> Result<PgPool> {
    let options = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime));

    let strategy = ExponentialBackoff::from_millis(100)
        .max_delay(Duration::from_secs(5))
        .map(jitter)
        .take(CONNECT_ATTEMPTS - 1);

    Retry::spawn(strategy, || {
        let options = options.clone();
        async move {
            options
                .connect(&config.database_url)
                .await
                .inspect_err(|e| tracing::warn!(error = %e, "Database connection attempt failed"))
        }
    })
    .await
    .context("Failed to connect to database")
}

/// Periodically drops throttling state for idle clients.
fn spawn_throttle_pruner(throttler: Arc<Throttler>) {
    let period = throttler.policy().window;

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            throttler.retain_recent();
            tracing::debug!(
                clients = throttler.tracked_clients(),
                "Pruned throttle state"
            );
        }
    });
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
