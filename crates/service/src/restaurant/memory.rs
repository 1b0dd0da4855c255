use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{info, instrument};

use super::domain::{most_popular, Restaurant, RestaurantPayload, SeedReport};
use super::seed::SeedLoader;
use super::store::RestaurantStore;
use crate::errors::ServiceError;

/// In-process store keeping records in insertion order.
///
/// Reads return clones and writes store values the store owns outright, so a
/// caller mutating what it got back (or what it passed in) can never reach the
/// stored records. Two-step operations (id assignment + insert, clear + load)
/// run under a single write guard.
pub struct MemoryRestaurantStore {
    records: RwLock<Vec<Restaurant>>,
    seed: SeedLoader,
}

impl MemoryRestaurantStore {
    /// Start from a copy of the seed dataset.
    pub fn from_seed(seed: SeedLoader) -> Result<Self, ServiceError> {
        let records = seed.load()?;
        Ok(Self { records: RwLock::new(records), seed })
    }

    /// Start empty; `ensure_seeded_once` or `reset` fill it later.
    pub fn empty(seed: SeedLoader) -> Self {
        Self { records: RwLock::new(Vec::new()), seed }
    }

    /// `max(id) + 1` by full scan, 1 for an empty collection.
    fn next_id(records: &[Restaurant]) -> Result<i64, ServiceError> {
        let max = records.iter().map(|r| r.id).fold(0, i64::max);
        max.checked_add(1).ok_or(ServiceError::IdExhausted(max))
    }

    fn position(records: &[Restaurant], id: i64) -> Option<usize> {
        records.iter().position(|r| r.id == id)
    }
}

#[async_trait]
impl RestaurantStore for MemoryRestaurantStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn list_all(&self) -> Result<Vec<Restaurant>, ServiceError> {
        Ok(self.records.read().await.clone())
    }

    async fn list_popular(&self, limit: usize) -> Result<Vec<Restaurant>, ServiceError> {
        let snapshot = self.records.read().await.clone();
        Ok(most_popular(snapshot, limit))
    }

    async fn get(&self, id: i64) -> Result<Option<Restaurant>, ServiceError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    #[instrument(skip(self, payload), fields(backend = "memory"))]
    async fn create(&self, payload: RestaurantPayload) -> Result<Restaurant, ServiceError> {
        payload.validate()?;
        let mut records = self.records.write().await;
        let created = payload.into_restaurant(Self::next_id(&records)?)?;
        records.push(created.clone());
        info!(id = created.id, "restaurant created");
        Ok(created)
    }

    #[instrument(skip(self, payload), fields(backend = "memory"))]
    async fn update(&self, id: i64, payload: RestaurantPayload) -> Result<Option<Restaurant>, ServiceError> {
        let mut records = self.records.write().await;
        let Some(idx) = Self::position(&records, id) else {
            return Ok(None);
        };
        payload.apply_to(&mut records[idx]);
        info!(id, "restaurant updated");
        Ok(Some(records[idx].clone()))
    }

    #[instrument(skip(self), fields(backend = "memory"))]
    async fn delete(&self, id: i64) -> Result<Option<Restaurant>, ServiceError> {
        let mut records = self.records.write().await;
        let Some(idx) = Self::position(&records, id) else {
            return Ok(None);
        };
        let removed = records.remove(idx);
        info!(id, "restaurant deleted");
        Ok(Some(removed))
    }

    #[instrument(skip(self), fields(backend = "memory"))]
    async fn reset(&self) -> Result<(), ServiceError> {
        // Load before taking the lock; a bad seed leaves the collection intact
        let fresh = self.seed.load()?;
        let count = fresh.len();
        *self.records.write().await = fresh;
        info!(count, "restaurant store reset from seed");
        Ok(())
    }

    async fn ensure_seeded_once(&self) -> Result<SeedReport, ServiceError> {
        let mut records = self.records.write().await;
        if !records.is_empty() {
            return Ok(SeedReport { seeded: false, count: records.len() });
        }
        *records = self.seed.load()?;
        info!(backend = "memory", count = records.len(), "restaurant store seeded");
        Ok(SeedReport { seeded: true, count: records.len() })
    }
}
