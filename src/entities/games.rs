use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// Catalog record. `base_price_cents` is absent only for free-to-play
/// titles; the catalog side owns writes, this crate only reads.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "games")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub base_price_cents: Option<i64>,
    pub is_free_to_play: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
