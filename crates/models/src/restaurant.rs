use sea_orm::{entity::prelude::*, ConnectionTrait, FromJsonQueryResult, QueryOrder, QuerySelect};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Recommended dishes, stored as a JSON array.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Menu(pub Vec<String>);

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "restaurant")]
pub struct Model {
    /// Storage identity, never exposed to clients.
    #[sea_orm(primary_key)]
    pub row_id: i64,
    /// Application id clients address records by.
    #[sea_orm(unique)]
    pub id: i64,
    pub name: String,
    pub category: String,
    pub location: String,
    pub price_range: String,
    pub rating: f64,
    pub description: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub recommended_menu: Menu,
    pub likes: i64,
    pub image: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Find the row carrying application id `id`.
pub async fn find_by_app_id<C: ConnectionTrait>(conn: &C, id: i64) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::Id.eq(id)).one(conn).await?)
}

/// Like [`find_by_app_id`] but takes a row lock (`FOR UPDATE`) held until the
/// surrounding transaction ends. A row removed by a transaction that committed
/// while this one waited is reported as absent.
pub async fn find_by_app_id_for_update<C: ConnectionTrait>(conn: &C, id: i64) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::Id.eq(id)).lock_exclusive().one(conn).await?)
}

/// Largest application id in the table, 0 when empty.
pub async fn max_app_id<C: ConnectionTrait>(conn: &C) -> Result<i64, ModelError> {
    let top = Entity::find().order_by_desc(Column::Id).one(conn).await?;
    Ok(top.map(|m| m.id).unwrap_or(0))
}
