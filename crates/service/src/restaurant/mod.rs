//! Restaurant module: domain types, seed loading, the store contract and its
//! two backends.

pub mod domain;
pub mod seed;
pub mod store;
pub mod memory;
pub mod seaorm;

pub use domain::{coerce_id, Restaurant, RestaurantPayload, SeedReport, DEFAULT_POPULAR_LIMIT};
pub use memory::MemoryRestaurantStore;
pub use seaorm::SeaOrmRestaurantStore;
pub use seed::SeedLoader;
pub use store::RestaurantStore;
