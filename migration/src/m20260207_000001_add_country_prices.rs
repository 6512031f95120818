use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum CountryPrices {
    Table,
    Id,
    GameId,
    CountryId,
    PriceCents,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CountryPrices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CountryPrices::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CountryPrices::GameId).uuid().not_null())
                    .col(ColumnDef::new(CountryPrices::CountryId).uuid().not_null())
                    .col(
                        ColumnDef::new(CountryPrices::PriceCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CountryPrices::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // At most one override per (game, country)
        manager
            .create_index(
                Index::create()
                    .name("idx_country_prices_game_country")
                    .table(CountryPrices::Table)
                    .col(CountryPrices::GameId)
                    .col(CountryPrices::CountryId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CountryPrices::Table).to_owned())
            .await
    }
}
