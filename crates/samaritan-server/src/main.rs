mod config;

use std::sync::Arc;

use samaritan_api::AppStateInner;
use samaritan_core::{Engines, SystemClock};
use samaritan_db::{MemoryStore, SqliteStore, Store};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::{Config, StoreBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "samaritan=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn Store> = match &config.backend {
        StoreBackend::Memory => {
            warn!("SAMARITAN_ENV=local: records are kept in memory only");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Sqlite { path, busy_timeout } => {
            info!("Opening store at {}", path.display());
            Arc::new(SqliteStore::open(path, *busy_timeout)?)
        }
    };

    let engines = Engines::new(store, &config.tables, Arc::new(SystemClock));
    let state = Arc::new(AppStateInner { engines });

    let app = samaritan_api::router(state, config.request_timeout)
        .layer(TraceLayer::new_for_http());

    info!("Samaritan server listening on {}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("SIGTERM handler unavailable: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
