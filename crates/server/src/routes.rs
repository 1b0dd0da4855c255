use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::restaurant::RestaurantStore;

pub mod restaurants;

/// Shared handler state: the store chosen at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RestaurantStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn RestaurantStore>) -> Self {
        Self { store }
    }
}

pub async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health { status: "ok", backend: state.store.backend() })
}

fn restaurant_routes() -> Router<AppState> {
    Router::new()
        .route("/restaurants", get(restaurants::list).post(restaurants::create))
        .route("/restaurants/popular", get(restaurants::popular))
        .route(
            "/restaurants/:id",
            get(restaurants::get).put(restaurants::update).delete(restaurants::delete),
        )
}

/// Build the application router. Restaurant routes are served both at the
/// root and under `/api`, where the frontend dev proxy forwards requests.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(restaurant_routes())
        .nest("/api", restaurant_routes())
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // One span per request with method and path
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // Status code and latency
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx at ERROR
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
