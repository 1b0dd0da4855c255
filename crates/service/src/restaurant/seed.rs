use std::path::PathBuf;

use tracing::debug;

use super::domain::Restaurant;
use crate::errors::ServiceError;

/// Reads the bundled seed dataset.
///
/// The file is read synchronously every time `load` is called so a reset always
/// sees the current contents on disk.
#[derive(Debug, Clone)]
pub struct SeedLoader {
    path: PathBuf,
}

impl SeedLoader {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<Vec<Restaurant>, ServiceError> {
        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| ServiceError::Seed(format!("cannot read {}: {e}", self.path.display())))?;
        let records: Vec<Restaurant> = serde_json::from_str(&raw)
            .map_err(|e| ServiceError::Seed(format!("malformed {}: {e}", self.path.display())))?;
        debug!(path = %self.path.display(), count = records.len(), "seed dataset loaded");
        Ok(records)
    }
}
