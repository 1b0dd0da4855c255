//! Create `restaurant` table.
//! `row_id` is the storage identity; `id` is the application-assigned number
//! clients address records by.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Restaurant::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Restaurant::RowId)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(big_integer(Restaurant::Id).not_null())
                    .col(text(Restaurant::Name).not_null())
                    .col(text(Restaurant::Category).not_null())
                    .col(text(Restaurant::Location).not_null())
                    .col(text(Restaurant::PriceRange).not_null().default("unknown"))
                    .col(double(Restaurant::Rating).not_null().default(0.0))
                    .col(text(Restaurant::Description).not_null().default(""))
                    .col(json_binary(Restaurant::RecommendedMenu).not_null())
                    .col(big_integer(Restaurant::Likes).not_null().default(0))
                    .col(text(Restaurant::Image).not_null().default(""))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Restaurant::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Restaurant {
    Table,
    RowId,
    Id,
    Name,
    Category,
    Location,
    PriceRange,
    Rating,
    Description,
    RecommendedMenu,
    Likes,
    Image,
}
