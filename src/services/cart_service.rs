use crate::database::DbConn;
use crate::entities::{cart_entity, cart_item_entity};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::{CatalogService, EntitlementService, PurchaseService};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
    SqlErr,
};
use uuid::Uuid;

/// Owns the per-user cart and its lines. Every mutation ends by recomputing
/// the cart total from the full line set; the cached total is never patched
/// incrementally.
#[derive(Clone)]
pub struct CartService {
    db: DbConn,
    catalog_service: CatalogService,
    entitlement_service: EntitlementService,
    purchase_service: PurchaseService,
}

impl CartService {
    pub fn new(
        db: DbConn,
        catalog_service: CatalogService,
        entitlement_service: EntitlementService,
        purchase_service: PurchaseService,
    ) -> Self {
        Self {
            db,
            catalog_service,
            entitlement_service,
            purchase_service,
        }
    }

    async fn find_cart(&self, user_id: Uuid) -> AppResult<Option<cart_entity::Model>> {
        let cart = cart_entity::Entity::find()
            .filter(cart_entity::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;
        Ok(cart)
    }

    async fn find_items(&self, cart_id: Uuid) -> AppResult<Vec<cart_item_entity::Model>> {
        let items = cart_item_entity::Entity::find()
            .filter(cart_item_entity::Column::CartId.eq(cart_id))
            .order_by_asc(cart_item_entity::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(items)
    }

    /// Idempotent lazy create. A concurrent first-add can lose the insert
    /// race on the unique user index; the loser re-reads the winner's row.
    pub async fn get_or_create_cart(&self, user_id: Uuid) -> AppResult<cart_entity::Model> {
        if let Some(cart) = self.find_cart(user_id).await? {
            return Ok(cart);
        }
        let now = Utc::now();
        let insert = cart_entity::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            total_amount_cents: Set(0),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await;

        match insert {
            Ok(cart) => Ok(cart),
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => self
                .find_cart(user_id)
                .await?
                .ok_or_else(|| AppError::InternalError("Cart missing after create race".into())),
            Err(err) => Err(err.into()),
        }
    }

    /// Read-only view; a user with no cart yet gets an empty one without a
    /// row being created.
    pub async fn get_cart(&self, user_id: Uuid) -> AppResult<CartResponse> {
        let Some(cart) = self.find_cart(user_id).await? else {
            return Ok(CartResponse::empty(user_id));
        };
        let items = self.find_items(cart.id).await?;
        Ok(CartResponse::from_parts(cart, items))
    }

    pub async fn add_item(
        &self,
        user_id: Uuid,
        req: &AddCartItemRequest,
    ) -> AppResult<CartItemResponse> {
        if req.quantity < 1 {
            return Err(AppError::ValidationError(
                "Quantity must be at least 1".into(),
            ));
        }
        let game = self
            .catalog_service
            .get_game(req.game_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Game not found.".into()))?;
        if game.is_free_to_play {
            return Err(AppError::InvalidOperation(
                "Cannot add free-to-play games to the cart.".into(),
            ));
        }
        // Only ownership blocks adding. Subscription coverage does not: the
        // subscription may lapse before the user checks out.
        if self
            .entitlement_service
            .find_purchase(user_id, req.game_id)
            .await?
            .is_some()
        {
            return Err(AppError::InvalidOperation(
                "You already own this game.".into(),
            ));
        }

        let cart = self.get_or_create_cart(user_id).await?;
        let existing = cart_item_entity::Entity::find()
            .filter(cart_item_entity::Column::CartId.eq(cart.id))
            .filter(cart_item_entity::Column::GameId.eq(req.game_id))
            .one(&self.db)
            .await?;

        let now = Utc::now();
        let item = match existing {
            Some(line) => {
                // Quantity bump keeps the unit price snapshotted at first
                // add; prices stay stable within a cart session
                let quantity = line.quantity + req.quantity;
                let unit_price_cents = line.unit_price_cents;
                let mut active = line.into_active_model();
                active.quantity = Set(quantity);
                active.line_total_cents = Set(i64::from(quantity) * unit_price_cents);
                active.updated_at = Set(now);
                active.update(&self.db).await?
            }
            None => {
                let unit_price_cents = game.base_price_cents.unwrap_or(0);
                cart_item_entity::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    cart_id: Set(cart.id),
                    game_id: Set(req.game_id),
                    quantity: Set(req.quantity),
                    unit_price_cents: Set(unit_price_cents),
                    line_total_cents: Set(i64::from(req.quantity) * unit_price_cents),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(&self.db)
                .await?
            }
        };

        self.recompute_total(cart.id).await?;
        Ok(CartItemResponse::from(item))
    }

    pub async fn remove_item(&self, user_id: Uuid, item_id: Uuid) -> AppResult<()> {
        let cart = self
            .find_cart(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cart not found.".into()))?;
        let line = cart_item_entity::Entity::find_by_id(item_id)
            .filter(cart_item_entity::Column::CartId.eq(cart.id))
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Cart item not found.".into()))?;

        cart_item_entity::Entity::delete_by_id(line.id)
            .exec(&self.db)
            .await?;
        self.recompute_total(cart.id).await?;
        Ok(())
    }

    pub async fn update_quantity(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        quantity: i32,
    ) -> AppResult<CartResponse> {
        if quantity < 0 {
            return Err(AppError::ValidationError(
                "Quantity cannot be negative".into(),
            ));
        }
        if quantity == 0 {
            // Documented equivalence: setting quantity to zero removes the
            // line
            self.remove_item(user_id, item_id).await?;
            return self.get_cart(user_id).await;
        }

        let cart = self
            .find_cart(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cart not found.".into()))?;
        let line = cart_item_entity::Entity::find_by_id(item_id)
            .filter(cart_item_entity::Column::CartId.eq(cart.id))
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Cart item not found.".into()))?;

        let unit_price_cents = line.unit_price_cents;
        let mut active = line.into_active_model();
        active.quantity = Set(quantity);
        active.line_total_cents = Set(i64::from(quantity) * unit_price_cents);
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await?;

        self.recompute_total(cart.id).await?;
        self.get_cart(user_id).await
    }

    /// Empties the cart and zeroes the total. Idempotent on an already
    /// empty cart; only a user with no cart at all gets `NotFound`.
    pub async fn clear(&self, user_id: Uuid) -> AppResult<()> {
        let cart = self
            .find_cart(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Cart not found.".into()))?;
        self.empty_cart(&cart).await
    }

    /// Attempts one purchase per line, then empties the cart no matter what
    /// happened: successful lines are gone, and failed lines would fail
    /// identically on a retry. Success means at least one line went
    /// through.
    pub async fn checkout(&self, user_id: Uuid) -> AppResult<CheckoutResponse> {
        let Some(cart) = self.find_cart(user_id).await? else {
            return Ok(CheckoutResponse::rejected("Cart is empty."));
        };
        let lines = self.find_items(cart.id).await?;
        if lines.is_empty() {
            return Ok(CheckoutResponse::rejected("Cart is empty."));
        }

        let total_amount_cents = cart.total_amount_cents;
        let mut purchased_games = Vec::new();
        let mut failed_games = Vec::new();

        for line in &lines {
            let game_name = self
                .catalog_service
                .get_game(line.game_id)
                .await?
                .map(|game| game.name)
                .unwrap_or_else(|| line.game_id.to_string());
            // Each line stands alone; one failure never aborts the rest
            match self.purchase_service.purchase(user_id, line.game_id).await {
                Ok(_) => purchased_games.push(game_name),
                Err(err) => {
                    log::warn!("Checkout line failed for user {user_id}: {game_name}");
                    failed_games.push(format!("{game_name}: {}", err.reason()));
                }
            }
        }

        self.empty_cart(&cart).await?;

        let success = !purchased_games.is_empty();
        log::info!(
            "Checkout for user {user_id}: {} purchased, {} failed",
            purchased_games.len(),
            failed_games.len()
        );
        Ok(CheckoutResponse {
            success,
            total_amount_cents,
            purchased_games,
            failed_games,
            message: None,
        })
    }

    async fn empty_cart(&self, cart: &cart_entity::Model) -> AppResult<()> {
        cart_item_entity::Entity::delete_many()
            .filter(cart_item_entity::Column::CartId.eq(cart.id))
            .exec(&self.db)
            .await?;
        let mut active = cart.clone().into_active_model();
        active.total_amount_cents = Set(0);
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await?;
        Ok(())
    }

    /// The cached total is always rebuilt from the authoritative line set.
    async fn recompute_total(&self, cart_id: Uuid) -> AppResult<i64> {
        let lines = cart_item_entity::Entity::find()
            .filter(cart_item_entity::Column::CartId.eq(cart_id))
            .all(&self.db)
            .await?;
        let total: i64 = lines.iter().map(|line| line.line_total_cents).sum();

        let cart = cart_entity::Entity::find_by_id(cart_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Cart not found.".into()))?;
        let mut active = cart.into_active_model();
        active.total_amount_cents = Set(total);
        active.updated_at = Set(Utc::now());
        active.update(&self.db).await?;
        Ok(total)
    }
}
