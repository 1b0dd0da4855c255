//! Environment/runtime helpers
//!
//! Sanity checks run at startup before the store is built.

use std::path::Path;

use tracing::warn;

/// Warn when the seed dataset is missing. Reading it later fails fatally,
/// this only surfaces the problem early in the logs.
pub async fn ensure_env(seed_path: &Path) -> anyhow::Result<()> {
    match tokio::fs::metadata(seed_path).await {
        Ok(meta) if meta.is_file() => Ok(()),
        Ok(_) => Err(anyhow::anyhow!("seed path {} is not a file", seed_path.display())),
        Err(_) => {
            warn!(seed_path = %seed_path.display(), "seed dataset not found; seeding will fail");
            Ok(())
        }
    }
}
