use crate::database::DbConn;
use crate::entities::purchase_entity;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::{CatalogService, EntitlementService, UserService};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    SqlErr,
};
use uuid::Uuid;

/// The sole writer of the purchase ledger. Direct purchases and checkout
/// both funnel through `purchase`, which is what makes the "(user, game)
/// at most once" invariant enforceable in one place.
#[derive(Clone)]
pub struct PurchaseService {
    db: DbConn,
    catalog_service: CatalogService,
    user_service: UserService,
    entitlement_service: EntitlementService,
}

impl PurchaseService {
    pub fn new(
        db: DbConn,
        catalog_service: CatalogService,
        user_service: UserService,
        entitlement_service: EntitlementService,
    ) -> Self {
        Self {
            db,
            catalog_service,
            user_service,
            entitlement_service,
        }
    }

    /// Validation runs in a fixed order; later checks assume the earlier
    /// ones already passed (the ownership check is only meaningful once the
    /// game is known to exist and cost money).
    pub async fn purchase(&self, user_id: Uuid, game_id: Uuid) -> AppResult<PurchaseResponse> {
        self.user_service
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found.".into()))?;
        let game = self
            .catalog_service
            .get_game(game_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Game not found.".into()))?;
        if game.is_free_to_play {
            return Err(AppError::InvalidOperation(
                "This game is free to play. No purchase required.".into(),
            ));
        }
        if self
            .entitlement_service
            .find_purchase(user_id, game_id)
            .await?
            .is_some()
        {
            return Err(AppError::InvalidOperation(
                "You already own this game.".into(),
            ));
        }
        if let GameAccess::Subscription { .. } = self
            .entitlement_service
            .resolve_access(user_id, game_id)
            .await?
        {
            return Err(AppError::InvalidOperation(
                "This game is already accessible through your subscription. No purchase needed."
                    .into(),
            ));
        }

        // Snapshot the live base price, never a cart's stale unit price
        let record = self
            .insert_purchase(user_id, game_id, game.base_price_cents.unwrap_or(0))
            .await?;
        log::info!("User {user_id} purchased {} for {} cents", game.name, record.price_paid_cents);
        Ok(PurchaseResponse::from(record))
    }

    /// Inserts the ledger row. A unique violation on (user_id, game_id)
    /// means a concurrent request won the race; that surfaces as `Conflict`
    /// rather than a silent double purchase.
    pub(crate) async fn insert_purchase(
        &self,
        user_id: Uuid,
        game_id: Uuid,
        price_paid_cents: i64,
    ) -> AppResult<purchase_entity::Model> {
        let insert = purchase_entity::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            game_id: Set(game_id),
            price_paid_cents: Set(price_paid_cents),
            purchased_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await;

        match insert {
            Ok(record) => Ok(record),
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                log::warn!("Concurrent purchase detected for user {user_id}, game {game_id}");
                Err(AppError::Conflict("You already own this game.".into()))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn list_purchases(
        &self,
        user_id: Uuid,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<PurchaseResponse>> {
        let paginator = purchase_entity::Entity::find()
            .filter(purchase_entity::Column::UserId.eq(user_id))
            .order_by_desc(purchase_entity::Column::PurchasedAt)
            .paginate(&self.db, params.per_page());
        let total = paginator.num_items().await?;
        let items = paginator
            .fetch_page(params.page_index())
            .await?
            .into_iter()
            .map(PurchaseResponse::from)
            .collect();
        Ok(PaginatedResponse::new(items, params, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_utils::*;
    use crate::services::testing;

    #[tokio::test]
    async fn test_purchase_records_current_base_price() {
        let db = setup_test_db().await;
        let services = testing::build(&db);

        let user = insert_user(&db, "ada").await;
        let game = insert_game(&db, "Elden Ring", Some(5999)).await;

        let purchase = services.purchases.purchase(user.id, game.id).await.unwrap();
        assert_eq!(purchase.user_id, user.id);
        assert_eq!(purchase.game_id, game.id);
        assert_eq!(purchase.price_paid_cents, 5999);
    }

    #[tokio::test]
    async fn test_purchase_validation_failures() {
        let db = setup_test_db().await;
        let services = testing::build(&db);

        let user = insert_user(&db, "bea").await;
        let game = insert_game(&db, "Outer Wilds", Some(2499)).await;
        let free = insert_free_game(&db, "Path of Exile").await;

        let missing_user = services.purchases.purchase(Uuid::new_v4(), game.id).await;
        assert!(matches!(missing_user, Err(AppError::NotFound(msg)) if msg == "User not found."));

        let missing_game = services.purchases.purchase(user.id, Uuid::new_v4()).await;
        assert!(matches!(missing_game, Err(AppError::NotFound(msg)) if msg == "Game not found."));

        let free_game = services.purchases.purchase(user.id, free.id).await;
        assert!(matches!(
            free_game,
            Err(AppError::InvalidOperation(msg))
                if msg == "This game is free to play. No purchase required."
        ));
    }

    #[tokio::test]
    async fn test_purchase_rejects_repeat_ownership() {
        let db = setup_test_db().await;
        let services = testing::build(&db);

        let user = insert_user(&db, "cyrus").await;
        let game = insert_game(&db, "Dishonored", Some(1999)).await;

        services.purchases.purchase(user.id, game.id).await.unwrap();
        let second = services.purchases.purchase(user.id, game.id).await;
        assert!(matches!(
            second,
            Err(AppError::InvalidOperation(msg)) if msg == "You already own this game."
        ));
    }

    #[tokio::test]
    async fn test_purchase_blocked_by_subscription_coverage() {
        let db = setup_test_db().await;
        let services = testing::build(&db);

        let user = insert_user(&db, "dara").await;
        let game = insert_game(&db, "Ghost of Tsushima", Some(4999)).await;
        let (_plan, option) = insert_plan(&db, "Premium", 1999, &[game.id]).await;
        insert_active_subscription(&db, user.id, &option).await;

        let result = services.purchases.purchase(user.id, game.id).await;
        assert!(matches!(
            result,
            Err(AppError::InvalidOperation(msg))
                if msg == "This game is already accessible through your subscription. No purchase needed."
        ));
        // The rejection must not have written to the ledger
        assert!(services
            .entitlements
            .find_purchase(user.id, game.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_ledger_insert_surfaces_as_conflict() {
        let db = setup_test_db().await;
        let services = testing::build(&db);

        let user = insert_user(&db, "edda").await;
        let game = insert_game(&db, "Factorio", Some(3000)).await;

        // Drive the insert directly, as two racing requests that both
        // passed validation would
        services
            .purchases
            .insert_purchase(user.id, game.id, 3000)
            .await
            .unwrap();
        let lost_race = services.purchases.insert_purchase(user.id, game.id, 3000).await;
        assert!(matches!(lost_race, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_list_purchases_newest_first() {
        let db = setup_test_db().await;
        let services = testing::build(&db);

        let user = insert_user(&db, "finn").await;
        let first = insert_game(&db, "Older", Some(1000)).await;
        let second = insert_game(&db, "Newer", Some(2000)).await;
        services.purchases.purchase(user.id, first.id).await.unwrap();
        services.purchases.purchase(user.id, second.id).await.unwrap();

        let page = services
            .purchases
            .list_purchases(user.id, &PaginationParams::new(None, None))
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].game_id, second.id);
    }
}
