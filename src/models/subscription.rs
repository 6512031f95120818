use crate::entities::{plan_pricing_option_entity, subscription_plan_entity, user_subscription_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubscribeRequest {
    pub pricing_option_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlanPricingOptionResponse {
    pub id: Uuid,
    pub duration_days: i32,
    pub price_cents: i64,
}

impl From<plan_pricing_option_entity::Model> for PlanPricingOptionResponse {
    fn from(option: plan_pricing_option_entity::Model) -> Self {
        Self {
            id: option.id,
            duration_days: option.duration_days,
            price_cents: option.price_cents,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlanResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub pricing_options: Vec<PlanPricingOptionResponse>,
    pub game_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionResponse {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub plan_name: String,
    pub price_cents: i64,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

impl SubscriptionResponse {
    pub fn from_parts(
        subscription: user_subscription_entity::Model,
        plan: &subscription_plan_entity::Model,
    ) -> Self {
        Self {
            id: subscription.id,
            plan_id: plan.id,
            plan_name: plan.name.clone(),
            price_cents: subscription.price_cents,
            starts_at: subscription.starts_at,
            ends_at: subscription.ends_at,
        }
    }
}
