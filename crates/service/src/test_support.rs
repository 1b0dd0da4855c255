#![cfg(test)]
use std::path::PathBuf;

use migration::MigratorTrait;
use models::db::connect_with_config;
use sea_orm::DatabaseConnection;
use tokio::sync::{Mutex, MutexGuard, OnceCell};

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();
// Database tests reset the whole table, so they take turns
static DB_LOCK: Mutex<()> = Mutex::const_new(());

/// Write `records` to a fresh temp file and return its path.
pub fn write_seed(records: &serde_json::Value) -> PathBuf {
    let path = std::env::temp_dir().join(format!("restaurants_seed_{}.json", uuid::Uuid::new_v4()));
    std::fs::write(&path, serde_json::to_vec(records).expect("serialize seed")).expect("write seed");
    path
}

/// Database tests run only with `DATABASE_URL` set and `SKIP_DB_TESTS` unset.
pub fn db_tests_enabled() -> bool {
    std::env::var("SKIP_DB_TESTS").is_err() && std::env::var("DATABASE_URL").is_ok()
}

fn test_db_config() -> configs::DatabaseConfig {
    let mut cfg = configs::DatabaseConfig::default();
    cfg.normalize_from_env();
    cfg.min_connections = 1;
    cfg.acquire_timeout_secs = 10;
    cfg
}

pub async fn get_db() -> Result<(DatabaseConnection, MutexGuard<'static, ()>), anyhow::Error> {
    let guard = DB_LOCK.lock().await;
    // Run migrations exactly once, with a throwaway connection
    MIGRATED
        .get_or_init(|| async {
            let db = connect_with_config(&test_db_config()).await.expect("connect db for migration");
            migration::Migrator::up(&db, None).await.expect("migrate up");
            drop(db);
        })
        .await;

    // Return a fresh connection for the current test's runtime
    let db = connect_with_config(&test_db_config()).await?;
    Ok((db, guard))
}
