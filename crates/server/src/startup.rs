use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use configs::{AppConfig, ServerConfig, StoreBackend};
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use service::restaurant::{MemoryRestaurantStore, RestaurantStore, SeaOrmRestaurantStore, SeedLoader};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes::{self, AppState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(server: &ServerConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", server.host, server.port).parse()?)
}

/// Store selected by configuration, plus the database handle to close on
/// shutdown when the database backend is active.
pub struct BuiltStore {
    pub store: Arc<dyn RestaurantStore>,
    pub db: Option<DatabaseConnection>,
}

/// Construct the configured backend. The database backend connects and runs
/// migrations; the memory backend starts from the seed dataset.
pub async fn build_store(cfg: &AppConfig) -> Result<BuiltStore, StartupError> {
    let seed = SeedLoader::new(cfg.store.seed_path.clone());
    match cfg.store.backend {
        StoreBackend::Memory => {
            let store = MemoryRestaurantStore::from_seed(seed)?;
            Ok(BuiltStore { store: Arc::new(store), db: None })
        }
        StoreBackend::Database => {
            let db = models::db::connect_with_config(&cfg.database)
                .await
                .map_err(StartupError::Database)?;
            migration::Migrator::up(&db, None)
                .await
                .map_err(|e| StartupError::Database(e.into()))?;
            let store = SeaOrmRestaurantStore::new(db.clone(), seed);
            Ok(BuiltStore { store: Arc::new(store), db: Some(db) })
        }
    }
}

/// Build the store and seed it if empty. Any failure here is fatal.
pub async fn prepare_state(cfg: &AppConfig) -> Result<(AppState, Option<DatabaseConnection>), StartupError> {
    let BuiltStore { store, db } = build_store(cfg).await?;
    let report = store.ensure_seeded_once().await?;
    info!(
        event = "seed_check",
        backend = store.backend(),
        seeded = report.seeded,
        count = report.count,
        "restaurant store ready"
    );
    Ok((AppState::new(store), db))
}

pub fn build_app(state: AppState) -> Router {
    routes::build_router(state, build_cors())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!(event = "shutdown_signal", signal = "SIGINT", "shutting down"),
        _ = terminate => info!(event = "shutdown_signal", signal = "SIGTERM", "shutting down"),
    }
}

/// Public entry: prepare the store, serve HTTP until a shutdown signal, then
/// close the database connection.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    common::env::ensure_env(&cfg.store.seed_path).await?;

    let (state, db) = prepare_state(&cfg).await?;
    let app = build_app(state);

    let addr = bind_addr(&cfg.server)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "restaurant api listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(db) = db {
        db.close().await?;
        info!(event = "db_closed", "database connection closed");
    }
    Ok(())
}
