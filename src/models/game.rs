use crate::entities::game_entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct GameQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Resolves regional prices when supplied.
    pub country_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GameDetailQuery {
    pub country_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GameResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub is_free_to_play: bool,
    /// Effective price for the requesting region: 0 for free-to-play,
    /// country override when one exists, base price otherwise.
    pub price_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl GameResponse {
    pub fn with_price(game: game_entity::Model, price_cents: i64) -> Self {
        Self {
            id: game.id,
            name: game.name,
            description: game.description,
            is_free_to_play: game.is_free_to_play,
            price_cents,
            created_at: game.created_at,
        }
    }
}

impl From<game_entity::Model> for GameResponse {
    fn from(game: game_entity::Model) -> Self {
        let price_cents = if game.is_free_to_play {
            0
        } else {
            game.base_price_cents.unwrap_or(0)
        };
        Self::with_price(game, price_cents)
    }
}
