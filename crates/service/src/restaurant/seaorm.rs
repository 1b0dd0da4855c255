use async_trait::async_trait;
use models::errors::ModelError;
use models::restaurant::{self, Menu};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, NotSet, PaginatorTrait, QueryOrder, QuerySelect,
    Set, TransactionTrait,
};
use tracing::{info, instrument, warn};

use super::domain::{Restaurant, RestaurantPayload, SeedReport};
use super::seed::SeedLoader;
use super::store::RestaurantStore;
use crate::errors::ServiceError;

/// Attempts at assigning an id before a unique-index conflict is surfaced.
const MAX_CREATE_ATTEMPTS: usize = 3;

/// SeaORM-backed store. Rows are matched by the application `id` column, which
/// carries a unique index; `row_id` is the table's own identity.
pub struct SeaOrmRestaurantStore {
    db: DatabaseConnection,
    seed: SeedLoader,
}

impl SeaOrmRestaurantStore {
    pub fn new(db: DatabaseConnection, seed: SeedLoader) -> Self {
        Self { db, seed }
    }

    async fn insert_seed<C: sea_orm::ConnectionTrait>(conn: &C, seed: &[Restaurant]) -> Result<(), ServiceError> {
        if seed.is_empty() {
            return Ok(());
        }
        restaurant::Entity::insert_many(seed.iter().map(to_active))
            .exec(conn)
            .await?;
        Ok(())
    }
}

impl From<restaurant::Model> for Restaurant {
    fn from(m: restaurant::Model) -> Self {
        Restaurant {
            id: m.id,
            name: m.name,
            category: m.category,
            location: m.location,
            price_range: m.price_range,
            rating: m.rating,
            description: m.description,
            recommended_menu: m.recommended_menu.0,
            likes: m.likes,
            image: m.image,
        }
    }
}

fn to_active(r: &Restaurant) -> restaurant::ActiveModel {
    restaurant::ActiveModel {
        row_id: NotSet,
        id: Set(r.id),
        name: Set(r.name.clone()),
        category: Set(r.category.clone()),
        location: Set(r.location.clone()),
        price_range: Set(r.price_range.clone()),
        rating: Set(r.rating),
        description: Set(r.description.clone()),
        recommended_menu: Set(Menu(r.recommended_menu.clone())),
        likes: Set(r.likes),
        image: Set(r.image.clone()),
    }
}

#[async_trait]
impl RestaurantStore for SeaOrmRestaurantStore {
    fn backend(&self) -> &'static str {
        "database"
    }

    async fn list_all(&self) -> Result<Vec<Restaurant>, ServiceError> {
        let rows = restaurant::Entity::find()
            .order_by_asc(restaurant::Column::Id)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Restaurant::from).collect())
    }

    async fn list_popular(&self, limit: usize) -> Result<Vec<Restaurant>, ServiceError> {
        // ties follow list_all order
        let rows = restaurant::Entity::find()
            .order_by_desc(restaurant::Column::Rating)
            .order_by_asc(restaurant::Column::Id)
            .limit(limit as u64)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Restaurant::from).collect())
    }

    async fn get(&self, id: i64) -> Result<Option<Restaurant>, ServiceError> {
        Ok(restaurant::find_by_app_id(&self.db, id).await?.map(Restaurant::from))
    }

    #[instrument(skip(self, payload), fields(backend = "database"))]
    async fn create(&self, payload: RestaurantPayload) -> Result<Restaurant, ServiceError> {
        payload.validate()?;
        let mut attempt = 1;
        loop {
            let max = restaurant::max_app_id(&self.db).await?;
            let id = max.checked_add(1).ok_or(ServiceError::IdExhausted(max))?;
            let record = payload.clone().into_restaurant(id)?;
            match to_active(&record).insert(&self.db).await.map_err(ModelError::from) {
                Ok(row) => {
                    info!(id, attempt, "restaurant created");
                    return Ok(row.into());
                }
                Err(ModelError::Conflict(msg)) if attempt < MAX_CREATE_ATTEMPTS => {
                    warn!(id, attempt, error = %msg, "id taken by a concurrent create; retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    #[instrument(skip(self, payload), fields(backend = "database"))]
    async fn update(&self, id: i64, payload: RestaurantPayload) -> Result<Option<Restaurant>, ServiceError> {
        let txn = self.db.begin().await?;
        // the row lock makes a concurrent delete wait for this update, or vice versa
        let Some(row) = restaurant::find_by_app_id_for_update(&txn, id).await? else {
            txn.rollback().await?;
            return Ok(None);
        };
        let mut merged = Restaurant::from(row.clone());
        payload.apply_to(&mut merged);

        let mut am: restaurant::ActiveModel = row.into();
        am.name = Set(merged.name);
        am.category = Set(merged.category);
        am.location = Set(merged.location);
        am.price_range = Set(merged.price_range);
        am.rating = Set(merged.rating);
        am.description = Set(merged.description);
        am.recommended_menu = Set(Menu(merged.recommended_menu));
        am.image = Set(merged.image);
        let updated = am.update(&txn).await?;
        txn.commit().await?;
        info!(id, "restaurant updated");
        Ok(Some(updated.into()))
    }

    #[instrument(skip(self), fields(backend = "database"))]
    async fn delete(&self, id: i64) -> Result<Option<Restaurant>, ServiceError> {
        let txn = self.db.begin().await?;
        let Some(row) = restaurant::find_by_app_id_for_update(&txn, id).await? else {
            txn.rollback().await?;
            return Ok(None);
        };
        let removed = row.clone().delete(&txn).await?;
        if removed.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(None);
        }
        txn.commit().await?;
        info!(id, "restaurant deleted");
        Ok(Some(row.into()))
    }

    #[instrument(skip(self), fields(backend = "database"))]
    async fn reset(&self) -> Result<(), ServiceError> {
        let seed = self.seed.load()?;
        let txn = self.db.begin().await?;
        restaurant::Entity::delete_many().exec(&txn).await?;
        Self::insert_seed(&txn, &seed).await?;
        txn.commit().await?;
        info!(count = seed.len(), "restaurant store reset from seed");
        Ok(())
    }

    async fn ensure_seeded_once(&self) -> Result<SeedReport, ServiceError> {
        let count = restaurant::Entity::find().count(&self.db).await?;
        if count > 0 {
            return Ok(SeedReport { seeded: false, count: count as usize });
        }
        let seed = self.seed.load()?;
        Self::insert_seed(&self.db, &seed).await?;
        info!(backend = "database", count = seed.len(), "restaurant store seeded");
        Ok(SeedReport { seeded: true, count: seed.len() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{db_tests_enabled, get_db, write_seed};
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn payload(v: Value) -> RestaurantPayload {
        serde_json::from_value(v).unwrap()
    }

    fn scenario_seed() -> SeedLoader {
        SeedLoader::new(write_seed(&json!([
            {"id": 1, "name": "A", "category": "k", "location": "s", "rating": 4},
            {"id": 2, "name": "B", "category": "k", "location": "s", "rating": 2}
        ])))
    }

    #[tokio::test]
    async fn seaorm_store_scenario() -> Result<(), anyhow::Error> {
        if !db_tests_enabled() {
            return Ok(());
        }
        let (db, _guard) = get_db().await?;
        let store = SeaOrmRestaurantStore::new(db, scenario_seed());
        store.reset().await?;

        let c = store.create(payload(json!({"name": "C", "category": "x", "location": "y", "likes": 5}))).await?;
        assert_eq!((c.id, c.likes, c.price_range.as_str()), (3, 0, "unknown"));

        let b = store.update(2, payload(json!({"rating": 9, "id": 50}))).await?.expect("id 2 exists");
        assert_eq!((b.id, b.rating, b.name.as_str()), (2, 9.0, "B"));

        let same = store.update(2, payload(json!({}))).await?.expect("id 2 exists");
        assert_eq!(same, b);

        let a = store.delete(1).await?.expect("id 1 exists");
        assert_eq!(a.name, "A");
        assert!(store.get(1).await?.is_none());
        assert!(store.delete(1).await?.is_none());
        assert!(store.update(1, payload(json!({"name": "x"}))).await?.is_none());

        let ids: Vec<i64> = store.list_all().await?.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3]);
        Ok(())
    }

    #[tokio::test]
    async fn seaorm_popular_and_reset() -> Result<(), anyhow::Error> {
        if !db_tests_enabled() {
            return Ok(());
        }
        let (db, _guard) = get_db().await?;
        let seed = SeedLoader::new(write_seed(&json!([
            {"id": 1, "rating": 5}, {"id": 2, "rating": 1}, {"id": 3, "rating": 5},
            {"id": 4, "rating": 3}, {"id": 5, "rating": 5}
        ])));
        let store = SeaOrmRestaurantStore::new(db, seed.clone());
        store.reset().await?;

        let top = store.list_popular(3).await?;
        assert_eq!(top.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 3, 5]);

        store.delete(3).await?;
        store.create(payload(json!({"name": "n", "category": "c", "location": "l"}))).await?;
        store.reset().await?;
        assert_eq!(store.list_all().await?, seed.load()?);
        Ok(())
    }

    #[tokio::test]
    async fn seaorm_popular_ties_follow_list_order() -> Result<(), anyhow::Error> {
        if !db_tests_enabled() {
            return Ok(());
        }
        let (db, _guard) = get_db().await?;
        let seed = SeedLoader::new(write_seed(&json!([
            {"id": 9, "rating": 5}, {"id": 2, "rating": 1}, {"id": 4, "rating": 5}
        ])));
        let store = SeaOrmRestaurantStore::new(db, seed);
        store.reset().await?;

        let listed: Vec<i64> = store.list_all().await?.iter().map(|r| r.id).collect();
        assert_eq!(listed, vec![2, 4, 9]);
        let top: Vec<i64> = store.list_popular(2).await?.iter().map(|r| r.id).collect();
        assert_eq!(top, vec![4, 9]);
        Ok(())
    }

    #[tokio::test]
    async fn seaorm_ensure_seeded_once() -> Result<(), anyhow::Error> {
        if !db_tests_enabled() {
            return Ok(());
        }
        let (db, _guard) = get_db().await?;
        restaurant::Entity::delete_many().exec(&db).await?;
        let store = SeaOrmRestaurantStore::new(db, scenario_seed());

        let first = store.ensure_seeded_once().await?;
        assert_eq!(first, SeedReport { seeded: true, count: 2 });
        let second = store.ensure_seeded_once().await?;
        assert_eq!(second, SeedReport { seeded: false, count: 2 });
        Ok(())
    }

    #[tokio::test]
    async fn seaorm_concurrent_creates_get_distinct_ids() -> Result<(), anyhow::Error> {
        if !db_tests_enabled() {
            return Ok(());
        }
        let (db, _guard) = get_db().await?;
        let store = Arc::new(SeaOrmRestaurantStore::new(db, scenario_seed()));
        store.reset().await?;

        let mut handles = Vec::new();
        for i in 0..2 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .create(payload(json!({"name": format!("c{i}"), "category": "c", "location": "l"})))
                    .await
            }));
        }
        let mut ids = Vec::new();
        for h in handles {
            ids.push(h.await??.id);
        }
        ids.sort();
        assert_eq!(ids, vec![3, 4]);
        Ok(())
    }

    #[tokio::test]
    async fn seaorm_concurrent_deletes_remove_once() -> Result<(), anyhow::Error> {
        if !db_tests_enabled() {
            return Ok(());
        }
        let (db, _guard) = get_db().await?;
        let store = Arc::new(SeaOrmRestaurantStore::new(db, scenario_seed()));

        for _ in 0..5 {
            store.reset().await?;
            let mut handles = Vec::new();
            for _ in 0..8 {
                let store = Arc::clone(&store);
                handles.push(tokio::spawn(async move { store.delete(1).await }));
            }
            let mut removed = 0;
            for h in handles {
                if h.await??.is_some() {
                    removed += 1;
                }
            }
            assert_eq!(removed, 1, "exactly one caller gets the deleted record");
            assert!(store.get(1).await?.is_none());
        }
        Ok(())
    }

    #[tokio::test]
    async fn seaorm_update_racing_delete_is_not_found_or_applied() -> Result<(), anyhow::Error> {
        if !db_tests_enabled() {
            return Ok(());
        }
        let (db, _guard) = get_db().await?;
        let store = Arc::new(SeaOrmRestaurantStore::new(db, scenario_seed()));

        for _ in 0..10 {
            store.reset().await?;
            let updater = {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.update(1, payload(json!({"name": "renamed"}))).await })
            };
            let deleter = {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.delete(1).await })
            };
            // either the update lands before the delete or it finds nothing; never an error
            if let Some(updated) = updater.await?? {
                assert_eq!(updated.name, "renamed");
            }
            assert!(deleter.await??.is_some());
        }
        Ok(())
    }

    #[tokio::test]
    async fn seaorm_create_after_largest_id_is_an_error() -> Result<(), anyhow::Error> {
        if !db_tests_enabled() {
            return Ok(());
        }
        let (db, _guard) = get_db().await?;
        let seed = SeedLoader::new(write_seed(&json!([{"id": i64::MAX, "name": "last"}])));
        let store = SeaOrmRestaurantStore::new(db, seed);
        store.reset().await?;

        let err = store
            .create(payload(json!({"name": "n", "category": "c", "location": "l"})))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::IdExhausted(i64::MAX)));
        assert_eq!(store.list_all().await?.len(), 1);
        Ok(())
    }
}
