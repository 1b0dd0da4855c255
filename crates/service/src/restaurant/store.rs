use async_trait::async_trait;

use super::domain::{Restaurant, RestaurantPayload, SeedReport};
use crate::errors::ServiceError;

/// Storage contract for restaurant records.
///
/// Implementations own the canonical collection and hand out independent
/// copies. "Not found" is `Ok(None)`, never an error.
#[async_trait]
pub trait RestaurantStore: Send + Sync {
    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;

    async fn list_all(&self) -> Result<Vec<Restaurant>, ServiceError>;

    /// Highest rated first, ties in existing order, at most `limit` records.
    async fn list_popular(&self, limit: usize) -> Result<Vec<Restaurant>, ServiceError>;

    async fn get(&self, id: i64) -> Result<Option<Restaurant>, ServiceError>;

    /// Validate, assign `max(id) + 1`, fill defaults and store.
    async fn create(&self, payload: RestaurantPayload) -> Result<Restaurant, ServiceError>;

    /// Overwrite the fields present in `payload`; `id` and `likes` never change.
    async fn update(&self, id: i64, payload: RestaurantPayload) -> Result<Option<Restaurant>, ServiceError>;

    /// Remove and return the record.
    async fn delete(&self, id: i64) -> Result<Option<Restaurant>, ServiceError>;

    /// Replace the whole collection with a fresh copy of the seed dataset.
    async fn reset(&self) -> Result<(), ServiceError>;

    /// Load the seed dataset only if the collection is empty.
    async fn ensure_seeded_once(&self) -> Result<SeedReport, ServiceError>;
}
