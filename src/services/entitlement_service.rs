use crate::database::DbConn;
use crate::entities::{game_entity, purchase_entity};
use crate::error::AppResult;
use crate::models::*;
use crate::services::{CatalogService, SubscriptionService};
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use std::collections::{BTreeSet, HashMap, HashSet};
use uuid::Uuid;

/// Decides how (and whether) a user may access a game. Read-only: this
/// service never mutates commerce state.
#[derive(Clone)]
pub struct EntitlementService {
    db: DbConn,
    catalog_service: CatalogService,
    subscription_service: SubscriptionService,
}

impl EntitlementService {
    pub fn new(
        db: DbConn,
        catalog_service: CatalogService,
        subscription_service: SubscriptionService,
    ) -> Self {
        Self {
            db,
            catalog_service,
            subscription_service,
        }
    }

    /// Ownership lookup shared with the cart and purchase paths.
    pub async fn find_purchase(
        &self,
        user_id: Uuid,
        game_id: Uuid,
    ) -> AppResult<Option<purchase_entity::Model>> {
        let purchase = purchase_entity::Entity::find()
            .filter(purchase_entity::Column::UserId.eq(user_id))
            .filter(purchase_entity::Column::GameId.eq(game_id))
            .one(&self.db)
            .await?;
        Ok(purchase)
    }

    /// The one classification point. Both the single-item and the batch
    /// path funnel through here so they cannot drift apart.
    fn classify(
        game: &game_entity::Model,
        purchased_at: Option<DateTime<Utc>>,
        subscription: Option<(&str, DateTime<Utc>)>,
    ) -> GameAccess {
        if game.is_free_to_play {
            return GameAccess::Free;
        }
        if let Some(purchased_at) = purchased_at {
            return GameAccess::Purchased { purchased_at };
        }
        if let Some((plan_name, expires_at)) = subscription {
            return GameAccess::Subscription {
                plan_name: plan_name.to_string(),
                expires_at,
            };
        }
        GameAccess::NoAccess { reason: None }
    }

    pub async fn resolve_access(&self, user_id: Uuid, game_id: Uuid) -> AppResult<GameAccess> {
        let Some(game) = self.catalog_service.get_game(game_id).await? else {
            return Ok(GameAccess::denied("game not found"));
        };
        // Free titles short-circuit before any paid-access lookups
        if game.is_free_to_play {
            return Ok(Self::classify(&game, None, None));
        }

        let purchased_at = self
            .find_purchase(user_id, game_id)
            .await?
            .map(|p| p.purchased_at);
        // Ownership is permanent; only consult the subscription when the
        // user does not own the game
        let coverage = if purchased_at.is_none() {
            self.subscription_coverage(user_id, game_id).await?
        } else {
            None
        };

        Ok(Self::classify(
            &game,
            purchased_at,
            coverage.as_ref().map(|(name, ends)| (name.as_str(), *ends)),
        ))
    }

    async fn subscription_coverage(
        &self,
        user_id: Uuid,
        game_id: Uuid,
    ) -> AppResult<Option<(String, DateTime<Utc>)>> {
        let Some(active) = self
            .subscription_service
            .get_active_subscription(user_id)
            .await?
        else {
            return Ok(None);
        };
        let bundle = self
            .subscription_service
            .get_plan_games(active.plan.id)
            .await?;
        if bundle.contains(&game_id) {
            Ok(Some((active.plan.name, active.subscription.ends_at)))
        } else {
            Ok(None)
        }
    }

    /// Everything the user can play: free titles, owned titles, and the
    /// active subscription's bundle, fetched as one batch and classified by
    /// the same rule as `resolve_access`.
    pub async fn resolve_library(&self, user_id: Uuid) -> AppResult<LibraryResponse> {
        let purchases = purchase_entity::Entity::find()
            .filter(purchase_entity::Column::UserId.eq(user_id))
            .all(&self.db)
            .await?;
        let purchased: HashMap<Uuid, DateTime<Utc>> = purchases
            .into_iter()
            .map(|p| (p.game_id, p.purchased_at))
            .collect();

        let active = self
            .subscription_service
            .get_active_subscription(user_id)
            .await?;
        let (bundle, plan_label): (HashSet<Uuid>, Option<(String, DateTime<Utc>)>) = match active {
            Some(active) => {
                let ids = self
                    .subscription_service
                    .get_plan_games(active.plan.id)
                    .await?;
                (
                    ids.into_iter().collect(),
                    Some((active.plan.name, active.subscription.ends_at)),
                )
            }
            None => (HashSet::new(), None),
        };

        let free_games = game_entity::Entity::find()
            .filter(game_entity::Column::IsFreeToPlay.eq(true))
            .filter(game_entity::Column::IsDeleted.eq(false))
            .all(&self.db)
            .await?;

        let mut wanted: BTreeSet<Uuid> = free_games.iter().map(|g| g.id).collect();
        wanted.extend(purchased.keys().copied());
        wanted.extend(bundle.iter().copied());

        let games = self
            .catalog_service
            .get_games(wanted.into_iter().collect())
            .await?;

        let mut entries = Vec::with_capacity(games.len());
        for game in games {
            let coverage = if bundle.contains(&game.id) {
                plan_label
                    .as_ref()
                    .map(|(name, ends)| (name.as_str(), *ends))
            } else {
                None
            };
            let access = Self::classify(&game, purchased.get(&game.id).copied(), coverage);
            entries.push(LibraryEntry {
                game: GameResponse::from(game),
                access,
            });
        }
        entries.sort_by(|a, b| a.game.name.cmp(&b.game.name));

        Ok(LibraryResponse { games: entries })
    }

    /// True when the user has bought anything or holds an active
    /// subscription. Free-to-play access does not count.
    pub async fn has_any_entitlement(&self, user_id: Uuid) -> AppResult<bool> {
        let owned = purchase_entity::Entity::find()
            .filter(purchase_entity::Column::UserId.eq(user_id))
            .count(&self.db)
            .await?;
        if owned > 0 {
            return Ok(true);
        }
        Ok(self
            .subscription_service
            .get_active_subscription(user_id)
            .await?
            .is_some())
    }
}
