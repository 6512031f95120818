use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum SubscriptionPlans {
    Table,
    Id,
    Name,
    Description,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PlanPricingOptions {
    Table,
    Id,
    PlanId,
    DurationDays,
    PriceCents,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PlanGames {
    Table,
    PlanId,
    GameId,
}

#[derive(DeriveIden)]
enum UserSubscriptions {
    Table,
    Id,
    UserId,
    PricingOptionId,
    PriceCents,
    StartsAt,
    EndsAt,
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
                    .table(SubscriptionPlans::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SubscriptionPlans::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPlans::Name)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SubscriptionPlans::Description).string().null())
                    .col(
                        ColumnDef::new(SubscriptionPlans::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PlanPricingOptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PlanPricingOptions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PlanPricingOptions::PlanId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PlanPricingOptions::DurationDays)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PlanPricingOptions::PriceCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PlanPricingOptions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_plan_pricing_options_plan_id")
                    .table(PlanPricingOptions::Table)
                    .col(PlanPricingOptions::PlanId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PlanGames::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PlanGames::PlanId).uuid().not_null())
                    .col(ColumnDef::new(PlanGames::GameId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(PlanGames::PlanId)
                            .col(PlanGames::GameId),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserSubscriptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserSubscriptions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserSubscriptions::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(UserSubscriptions::PricingOptionId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserSubscriptions::PriceCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserSubscriptions::StartsAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserSubscriptions::EndsAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserSubscriptions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_user_subscriptions_user_ends")
                    .table(UserSubscriptions::Table)
                    .col(UserSubscriptions::UserId)
                    .col(UserSubscriptions::EndsAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserSubscriptions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PlanGames::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PlanPricingOptions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SubscriptionPlans::Table).to_owned())
            .await
    }
}
