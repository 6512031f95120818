use crate::database::DbConn;
use crate::entities::{country_price_entity, game_entity};
use crate::error::AppResult;
use crate::models::*;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use std::collections::HashMap;
use uuid::Uuid;

/// Read-only view of the catalog. Games, plans, and regional overrides are
/// owned by the catalog/admin side; nothing here mutates them.
#[derive(Clone)]
pub struct CatalogService {
    db: DbConn,
}

impl CatalogService {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// Soft-deleted games are invisible to the storefront.
    pub async fn get_game(&self, game_id: Uuid) -> AppResult<Option<game_entity::Model>> {
        let game = game_entity::Entity::find_by_id(game_id)
            .filter(game_entity::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await?;
        Ok(game)
    }

    /// Batch fetch for the library path; same soft-delete filter as
    /// `get_game`.
    pub async fn get_games(&self, game_ids: Vec<Uuid>) -> AppResult<Vec<game_entity::Model>> {
        if game_ids.is_empty() {
            return Ok(Vec::new());
        }
        let games = game_entity::Entity::find()
            .filter(game_entity::Column::Id.is_in(game_ids))
            .filter(game_entity::Column::IsDeleted.eq(false))
            .all(&self.db)
            .await?;
        Ok(games)
    }

    pub async fn get_country_price(
        &self,
        game_id: Uuid,
        country_id: Uuid,
    ) -> AppResult<Option<i64>> {
        let row = country_price_entity::Entity::find()
            .filter(country_price_entity::Column::GameId.eq(game_id))
            .filter(country_price_entity::Column::CountryId.eq(country_id))
            .one(&self.db)
            .await?;
        Ok(row.map(|cp| cp.price_cents))
    }

    /// Price shown to a region: 0 for free-to-play, the country override
    /// when one exists, the base price otherwise.
    pub async fn effective_price_cents(
        &self,
        game: &game_entity::Model,
        country_id: Option<Uuid>,
    ) -> AppResult<i64> {
        if game.is_free_to_play {
            return Ok(0);
        }
        if let Some(country_id) = country_id
            && let Some(price) = self.get_country_price(game.id, country_id).await?
        {
            return Ok(price);
        }
        Ok(game.base_price_cents.unwrap_or(0))
    }

    pub async fn list_games(
        &self,
        query: &GameQuery,
    ) -> AppResult<PaginatedResponse<GameResponse>> {
        let params = PaginationParams::new(query.page, query.per_page);
        let paginator = game_entity::Entity::find()
            .filter(game_entity::Column::IsDeleted.eq(false))
            .order_by_asc(game_entity::Column::Name)
            .paginate(&self.db, params.per_page());
        let total = paginator.num_items().await?;
        let games = paginator.fetch_page(params.page_index()).await?;

        // Resolve regional overrides for the whole page in one query
        let overrides: HashMap<Uuid, i64> = match query.country_id {
            Some(country_id) => {
                let ids: Vec<Uuid> = games.iter().map(|g| g.id).collect();
                country_price_entity::Entity::find()
                    .filter(country_price_entity::Column::CountryId.eq(country_id))
                    .filter(country_price_entity::Column::GameId.is_in(ids))
                    .all(&self.db)
                    .await?
                    .into_iter()
                    .map(|cp| (cp.game_id, cp.price_cents))
                    .collect()
            }
            None => HashMap::new(),
        };

        let items = games
            .into_iter()
            .map(|game| {
                let price_cents = if game.is_free_to_play {
                    0
                } else {
                    overrides
                        .get(&game.id)
                        .copied()
                        .or(game.base_price_cents)
                        .unwrap_or(0)
                };
                GameResponse::with_price(game, price_cents)
            })
            .collect();

        Ok(PaginatedResponse::new(items, &params, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_utils::*;

    #[tokio::test]
    async fn test_soft_deleted_games_are_hidden() {
        let db = setup_test_db().await;
        let service = CatalogService::new(db.clone());

        let game = insert_game(&db, "Hollow Knight", Some(1500)).await;
        let deleted = insert_deleted_game(&db, "Gone", Some(999)).await;

        assert!(service.get_game(game.id).await.unwrap().is_some());
        assert!(service.get_game(deleted.id).await.unwrap().is_none());

        let batch = service.get_games(vec![game.id, deleted.id]).await.unwrap();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].id, game.id);
    }

    #[tokio::test]
    async fn test_effective_price_prefers_country_override() {
        let db = setup_test_db().await;
        let service = CatalogService::new(db.clone());

        let game = insert_game(&db, "Celeste", Some(2000)).await;
        let country = uuid::Uuid::new_v4();
        insert_country_price(&db, game.id, country, 1200).await;

        assert_eq!(
            service
                .effective_price_cents(&game, Some(country))
                .await
                .unwrap(),
            1200
        );
        // Unknown country falls back to the base price
        assert_eq!(
            service
                .effective_price_cents(&game, Some(uuid::Uuid::new_v4()))
                .await
                .unwrap(),
            2000
        );
        assert_eq!(service.effective_price_cents(&game, None).await.unwrap(), 2000);
    }

    #[tokio::test]
    async fn test_effective_price_is_zero_for_free_to_play() {
        let db = setup_test_db().await;
        let service = CatalogService::new(db.clone());

        let game = insert_free_game(&db, "Warframe").await;
        let country = uuid::Uuid::new_v4();
        insert_country_price(&db, game.id, country, 5000).await;

        assert_eq!(
            service
                .effective_price_cents(&game, Some(country))
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_list_games_paginates_with_regional_prices() {
        let db = setup_test_db().await;
        let service = CatalogService::new(db.clone());

        let a = insert_game(&db, "Axiom Verge", Some(2000)).await;
        insert_game(&db, "Blasphemous", Some(2500)).await;
        insert_deleted_game(&db, "Cancelled", Some(100)).await;
        let country = uuid::Uuid::new_v4();
        insert_country_price(&db, a.id, country, 1800).await;

        let page = service
            .list_games(&GameQuery {
                page: Some(1),
                per_page: Some(10),
                country_id: Some(country),
            })
            .await
            .unwrap();

        assert_eq!(page.total, 2);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].name, "Axiom Verge");
        assert_eq!(page.items[0].price_cents, 1800);
        assert_eq!(page.items[1].price_cents, 2500);
    }
}
