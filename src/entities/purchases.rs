use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// Append-only ownership ledger. The unique (user_id, game_id) index is the
/// enforcement point for "purchased at most once".
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "purchases")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub game_id: Uuid,
    pub price_paid_cents: i64,
    pub purchased_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
