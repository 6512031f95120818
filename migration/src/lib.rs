pub use sea_orm_migration::prelude::*;

mod m20260110_000001_initial;
mod m20260124_000001_add_subscriptions;
mod m20260207_000001_add_country_prices;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260110_000001_initial::Migration),
            Box::new(m20260124_000001_add_subscriptions::Migration),
            Box::new(m20260207_000001_add_country_prices::Migration),
        ]
    }
}
