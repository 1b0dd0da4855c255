use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Application ids must stay unique; concurrent creates that pick the
        // same max+1 collide here instead of storing duplicates.
        manager
            .create_index(
                Index::create()
                    .name("uniq_restaurant_id")
                    .table(Restaurant::Table)
                    .col(Restaurant::Id)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Popular listing sorts by rating
        manager
            .create_index(
                Index::create()
                    .name("idx_restaurant_rating")
                    .table(Restaurant::Table)
                    .col(Restaurant::Rating)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uniq_restaurant_id").table(Restaurant::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_restaurant_rating").table(Restaurant::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Restaurant { Table, Id, Rating }
