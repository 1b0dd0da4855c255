use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use service::restaurant::{coerce_id, Restaurant, RestaurantPayload, DEFAULT_POPULAR_LIMIT};

use crate::errors::ApiError;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct PopularQuery {
    pub limit: Option<String>,
}

impl PopularQuery {
    /// Non-numeric or negative limits fall back to the default.
    fn limit(&self) -> usize {
        self.limit
            .as_deref()
            .and_then(coerce_id)
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(DEFAULT_POPULAR_LIMIT)
    }
}

fn not_found(raw: &str) -> ApiError {
    ApiError::not_found(format_args!("restaurant {raw}"))
}

/// List all restaurants
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Restaurant>>, ApiError> {
    Ok(Json(state.store.list_all().await?))
}

/// Highest rated restaurants
pub async fn popular(
    State(state): State<AppState>,
    Query(q): Query<PopularQuery>,
) -> Result<Json<Vec<Restaurant>>, ApiError> {
    Ok(Json(state.store.list_popular(q.limit()).await?))
}

pub async fn get(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<Restaurant>, ApiError> {
    let Some(id) = coerce_id(&raw) else {
        return Err(not_found(&raw));
    };
    state.store.get(id).await?.map(Json).ok_or_else(|| not_found(&raw))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<RestaurantPayload>,
) -> Result<(StatusCode, Json<Restaurant>), ApiError> {
    let created = state.store.create(payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(raw): Path<String>,
    Json(payload): Json<RestaurantPayload>,
) -> Result<Json<Restaurant>, ApiError> {
    let Some(id) = coerce_id(&raw) else {
        return Err(not_found(&raw));
    };
    state.store.update(id, payload).await?.map(Json).ok_or_else(|| not_found(&raw))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(raw): Path<String>,
) -> Result<Json<Restaurant>, ApiError> {
    let Some(id) = coerce_id(&raw) else {
        return Err(not_found(&raw));
    };
    state.store.delete(id).await?.map(Json).ok_or_else(|| not_found(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popular_limit_defaults() {
        let q = |limit: Option<&str>| PopularQuery { limit: limit.map(str::to_string) }.limit();
        assert_eq!(q(None), DEFAULT_POPULAR_LIMIT);
        assert_eq!(q(Some("3")), 3);
        assert_eq!(q(Some("abc")), DEFAULT_POPULAR_LIMIT);
        assert_eq!(q(Some("-1")), DEFAULT_POPULAR_LIMIT);
        assert_eq!(q(Some("0")), 0);
    }
}
