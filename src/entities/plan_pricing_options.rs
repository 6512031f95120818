use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// A purchasable term for a plan (e.g. 30 or 365 days). User subscriptions
/// reference the option, not the plan directly.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "plan_pricing_options")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub plan_id: Uuid,
    pub duration_days: i32,
    pub price_cents: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
