use crate::database::DbConn;
use crate::entities::{
    plan_game_entity, plan_pricing_option_entity, subscription_plan_entity, user_entity,
    user_subscription_entity,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use std::collections::HashMap;
use uuid::Uuid;

/// An active subscription joined to the plan it was bought under.
pub struct ActiveSubscription {
    pub subscription: user_subscription_entity::Model,
    pub plan: subscription_plan_entity::Model,
}

#[derive(Clone)]
pub struct SubscriptionService {
    db: DbConn,
}

impl SubscriptionService {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// The single subscription the rest of the system ever considers: the
    /// most recent row whose end has not passed. Historical rows stay in the
    /// table but are never consulted.
    pub async fn get_active_subscription(
        &self,
        user_id: Uuid,
    ) -> AppResult<Option<ActiveSubscription>> {
        let Some(subscription) = user_subscription_entity::Entity::find()
            .filter(user_subscription_entity::Column::UserId.eq(user_id))
            .filter(user_subscription_entity::Column::EndsAt.gte(Utc::now()))
            .order_by_desc(user_subscription_entity::Column::StartsAt)
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let option = plan_pricing_option_entity::Entity::find_by_id(subscription.pricing_option_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                AppError::InternalError("Subscription references a missing pricing option".into())
            })?;
        let plan = subscription_plan_entity::Entity::find_by_id(option.plan_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                AppError::InternalError("Pricing option references a missing plan".into())
            })?;

        Ok(Some(ActiveSubscription { subscription, plan }))
    }

    pub async fn get_plan_games(&self, plan_id: Uuid) -> AppResult<Vec<Uuid>> {
        let links = plan_game_entity::Entity::find()
            .filter(plan_game_entity::Column::PlanId.eq(plan_id))
            .all(&self.db)
            .await?;
        Ok(links.into_iter().map(|link| link.game_id).collect())
    }

    /// Starts a subscription from now for the chosen pricing option's term.
    /// Rejected while any subscription is still active; overlapping
    /// subscriptions do not exist in this system.
    pub async fn subscribe(
        &self,
        user_id: Uuid,
        req: &SubscribeRequest,
    ) -> AppResult<SubscriptionResponse> {
        user_entity::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found.".into()))?;
        let option = plan_pricing_option_entity::Entity::find_by_id(req.pricing_option_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Pricing option not found.".into()))?;

        if self.get_active_subscription(user_id).await?.is_some() {
            return Err(AppError::InvalidOperation(
                "You already have an active subscription.".into(),
            ));
        }

        let plan = subscription_plan_entity::Entity::find_by_id(option.plan_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                AppError::InternalError("Pricing option references a missing plan".into())
            })?;

        let now = Utc::now();
        let subscription = user_subscription_entity::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            pricing_option_id: Set(option.id),
            price_cents: Set(option.price_cents),
            starts_at: Set(now),
            ends_at: Set(now + Duration::days(i64::from(option.duration_days))),
            created_at: Set(now),
        }
        .insert(&self.db)
        .await?;

        log::info!(
            "User {user_id} subscribed to plan {} for {} days",
            plan.name,
            option.duration_days
        );
        Ok(SubscriptionResponse::from_parts(subscription, &plan))
    }

    pub async fn list_plans(&self) -> AppResult<Vec<PlanResponse>> {
        let plans = subscription_plan_entity::Entity::find()
            .order_by_asc(subscription_plan_entity::Column::Name)
            .all(&self.db)
            .await?;
        let options = plan_pricing_option_entity::Entity::find().all(&self.db).await?;
        let links = plan_game_entity::Entity::find().all(&self.db).await?;

        let mut options_by_plan: HashMap<Uuid, Vec<PlanPricingOptionResponse>> = HashMap::new();
        for option in options {
            options_by_plan
                .entry(option.plan_id)
                .or_default()
                .push(PlanPricingOptionResponse::from(option));
        }
        let mut games_by_plan: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for link in links {
            games_by_plan.entry(link.plan_id).or_default().push(link.game_id);
        }

        Ok(plans
            .into_iter()
            .map(|plan| PlanResponse {
                id: plan.id,
                name: plan.name,
                description: plan.description,
                pricing_options: options_by_plan.remove(&plan.id).unwrap_or_default(),
                game_ids: games_by_plan.remove(&plan.id).unwrap_or_default(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_utils::*;

    #[tokio::test]
    async fn test_active_subscription_ignores_expired_rows() {
        let db = setup_test_db().await;
        let service = SubscriptionService::new(db.clone());

        let user = insert_user(&db, "mira").await;
        let (_plan, option) = insert_plan(&db, "Essential", 999, &[]).await;
        insert_expired_subscription(&db, user.id, &option).await;

        assert!(service
            .get_active_subscription(user.id)
            .await
            .unwrap()
            .is_none());

        insert_active_subscription(&db, user.id, &option).await;
        let active = service
            .get_active_subscription(user.id)
            .await
            .unwrap()
            .expect("subscription should be active");
        assert_eq!(active.plan.name, "Essential");
    }

    #[tokio::test]
    async fn test_subscribe_rejected_while_active() {
        let db = setup_test_db().await;
        let service = SubscriptionService::new(db.clone());

        let user = insert_user(&db, "odin").await;
        let (_plan, option) = insert_plan(&db, "Premium", 1999, &[]).await;

        let first = service
            .subscribe(
                user.id,
                &SubscribeRequest {
                    pricing_option_id: option.id,
                },
            )
            .await
            .unwrap();
        assert_eq!(first.plan_name, "Premium");
        assert_eq!(first.price_cents, 1999);

        let second = service
            .subscribe(
                user.id,
                &SubscribeRequest {
                    pricing_option_id: option.id,
                },
            )
            .await;
        assert!(matches!(second, Err(AppError::InvalidOperation(_))));
    }

    #[tokio::test]
    async fn test_subscribe_unknown_user_or_option() {
        let db = setup_test_db().await;
        let service = SubscriptionService::new(db.clone());

        let user = insert_user(&db, "kai").await;
        let (_plan, option) = insert_plan(&db, "Extra", 1499, &[]).await;

        let missing_user = service
            .subscribe(
                Uuid::new_v4(),
                &SubscribeRequest {
                    pricing_option_id: option.id,
                },
            )
            .await;
        assert!(matches!(missing_user, Err(AppError::NotFound(_))));

        let missing_option = service
            .subscribe(
                user.id,
                &SubscribeRequest {
                    pricing_option_id: Uuid::new_v4(),
                },
            )
            .await;
        assert!(matches!(missing_option, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_list_plans_assembles_options_and_bundles() {
        let db = setup_test_db().await;
        let service = SubscriptionService::new(db.clone());

        let game = insert_game(&db, "Returnal", Some(6999)).await;
        insert_plan(&db, "Extra", 1499, &[game.id]).await;
        insert_plan(&db, "Essential", 999, &[]).await;

        let plans = service.list_plans().await.unwrap();
        assert_eq!(plans.len(), 2);
        assert_eq!(plans[0].name, "Essential");
        assert_eq!(plans[1].name, "Extra");
        assert_eq!(plans[1].game_ids, vec![game.id]);
        assert_eq!(plans[1].pricing_options.len(), 1);
        assert_eq!(plans[1].pricing_options[0].price_cents, 1499);
    }
}
