//! Service layer for the restaurant directory.
//! - `restaurant::RestaurantStore` is the storage contract the HTTP layer consumes.
//! - Two backends: an in-process memory store and a SeaORM-backed store.
//! - Seed data is read from a JSON file on demand.

pub mod errors;
#[cfg(test)]
pub mod test_support;
pub mod restaurant;
