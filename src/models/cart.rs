use crate::entities::{cart_entity, cart_item_entity};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AddCartItemRequest {
    pub game_id: Uuid,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateCartItemRequest {
    pub quantity: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CartItemResponse {
    pub id: Uuid,
    pub game_id: Uuid,
    pub quantity: i32,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

impl From<cart_item_entity::Model> for CartItemResponse {
    fn from(item: cart_item_entity::Model) -> Self {
        Self {
            id: item.id,
            game_id: item.game_id,
            quantity: item.quantity,
            unit_price_cents: item.unit_price_cents,
            line_total_cents: item.line_total_cents,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CartResponse {
    pub user_id: Uuid,
    pub total_amount_cents: i64,
    pub items: Vec<CartItemResponse>,
}

impl CartResponse {
    /// View for a user whose cart has not been created yet.
    pub fn empty(user_id: Uuid) -> Self {
        Self {
            user_id,
            total_amount_cents: 0,
            items: Vec::new(),
        }
    }

    pub fn from_parts(cart: cart_entity::Model, items: Vec<cart_item_entity::Model>) -> Self {
        Self {
            user_id: cart.user_id,
            total_amount_cents: cart.total_amount_cents,
            items: items.into_iter().map(CartItemResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckoutResponse {
    pub success: bool,
    /// The cart total as it stood before the cart was cleared.
    pub total_amount_cents: i64,
    pub purchased_games: Vec<String>,
    pub failed_games: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckoutResponse {
    pub fn rejected(message: &str) -> Self {
        Self {
            success: false,
            total_amount_cents: 0,
            purchased_games: Vec::new(),
            failed_games: Vec::new(),
            message: Some(message.to_string()),
        }
    }
}
