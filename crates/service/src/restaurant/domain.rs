use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::errors::ServiceError;

/// Price range stored when a record does not provide one.
pub const DEFAULT_PRICE_RANGE: &str = "unknown";

/// Number of records returned by the popular listing when no limit is given.
pub const DEFAULT_POPULAR_LIMIT: usize = 5;

/// A restaurant record as clients see it.
///
/// Seed files are parsed leniently: every field except `id` may be absent or
/// `null` and falls back to the same defaults `create` applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default = "default_price_range", deserialize_with = "null_as_price_range")]
    pub price_range: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rating: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recommended_menu: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub likes: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
}

fn default_price_range() -> String {
    DEFAULT_PRICE_RANGE.to_string()
}

fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

fn null_as_price_range<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(d)?.unwrap_or_else(default_price_range))
}

/// Body of create and update requests.
///
/// `id` and `likes` are deliberately absent: unknown JSON keys are ignored, so
/// clients can never set them. `recommendedMenu` stays loosely typed because a
/// non-array value is tolerated and simply ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantPayload {
    pub name: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub price_range: Option<String>,
    pub rating: Option<f64>,
    pub description: Option<String>,
    pub recommended_menu: Option<Value>,
    pub image: Option<String>,
}

impl RestaurantPayload {
    /// Check the create requirements: `name`, `category`, `location` present
    /// and non-empty, reported in that order.
    pub fn validate(&self) -> Result<(), ServiceError> {
        let required = [
            ("name", &self.name),
            ("category", &self.category),
            ("location", &self.location),
        ];
        for (field, value) in required {
            if value.as_deref().map_or(true, str::is_empty) {
                return Err(ServiceError::MissingField(field));
            }
        }
        Ok(())
    }

    /// The menu, if the payload carries an array of strings.
    pub fn menu(&self) -> Option<Vec<String>> {
        let Some(Value::Array(items)) = &self.recommended_menu else {
            return None;
        };
        items.iter().map(|v| v.as_str().map(str::to_string)).collect()
    }

    /// Build a new record with `id`, defaults filled and `likes` forced to 0.
    pub fn into_restaurant(self, id: i64) -> Result<Restaurant, ServiceError> {
        self.validate()?;
        let recommended_menu = self.menu().unwrap_or_default();
        Ok(Restaurant {
            id,
            name: self.name.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            location: self.location.unwrap_or_default(),
            price_range: self.price_range.unwrap_or_else(default_price_range),
            rating: self.rating.unwrap_or(0.0),
            description: self.description.unwrap_or_default(),
            recommended_menu,
            likes: 0,
            image: self.image.unwrap_or_default(),
        })
    }

    /// Merge present fields into `target`. `id` and `likes` are untouched.
    pub fn apply_to(self, target: &mut Restaurant) {
        if let Some(menu) = self.menu() {
            target.recommended_menu = menu;
        }
        if let Some(v) = self.name {
            target.name = v;
        }
        if let Some(v) = self.category {
            target.category = v;
        }
        if let Some(v) = self.location {
            target.location = v;
        }
        if let Some(v) = self.price_range {
            target.price_range = v;
        }
        if let Some(v) = self.rating {
            target.rating = v;
        }
        if let Some(v) = self.description {
            target.description = v;
        }
        if let Some(v) = self.image {
            target.image = v;
        }
    }
}

/// Outcome of the startup seeding step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub seeded: bool,
    pub count: usize,
}

/// Turn a raw id (path segment, query value) into a record id.
///
/// Accepts anything that reads as a finite integral number, e.g. `"7"`,
/// `" 7 "`, `"7.0"` or `"7e0"`. Everything else maps to `None`, which callers
/// treat as "no such record".
pub fn coerce_id(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(id) = trimmed.parse::<i64>() {
        return Some(id);
    }
    let n = trimmed.parse::<f64>().ok().filter(|n| n.is_finite())?;
    if n.fract() != 0.0 || n < i64::MIN as f64 || n >= i64::MAX as f64 {
        return None;
    }
    Some(n as i64)
}

/// Stable sort by rating, highest first, then keep `limit` records.
pub(crate) fn most_popular(mut records: Vec<Restaurant>, limit: usize) -> Vec<Restaurant> {
    records.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    records.truncate(limit);
    records
}
