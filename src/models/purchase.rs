use crate::entities::purchase_entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PurchaseRequest {
    pub game_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PurchaseUserQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PurchaseHistoryQuery {
    pub user_id: Uuid,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PurchaseResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub game_id: Uuid,
    pub price_paid_cents: i64,
    pub purchased_at: DateTime<Utc>,
}

impl From<purchase_entity::Model> for PurchaseResponse {
    fn from(p: purchase_entity::Model) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            game_id: p.game_id,
            price_paid_cents: p.price_paid_cents,
            purchased_at: p.purchased_at,
        }
    }
}
