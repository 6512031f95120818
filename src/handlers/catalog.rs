use crate::error::AppError;
use crate::models::*;
use crate::services::CatalogService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/games",
    tag = "catalog",
    params(
        ("page" = Option<u64>, Query, description = "Page number"),
        ("per_page" = Option<u64>, Query, description = "Page size"),
        ("country_id" = Option<Uuid>, Query, description = "Resolve regional prices for this country")
    ),
    responses(
        (status = 200, description = "Paginated catalog with effective prices")
    )
)]
pub async fn list_games(
    catalog_service: web::Data<CatalogService>,
    query: web::Query<GameQuery>,
) -> Result<HttpResponse> {
    match catalog_service.list_games(&query).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/games/{game_id}",
    tag = "catalog",
    params(
        ("game_id" = Uuid, Path, description = "Game identifier"),
        ("country_id" = Option<Uuid>, Query, description = "Resolve the regional price for this country")
    ),
    responses(
        (status = 200, description = "Game with its effective price", body = GameResponse),
        (status = 404, description = "Game not found")
    )
)]
pub async fn get_game(
    catalog_service: web::Data<CatalogService>,
    path: web::Path<Uuid>,
    query: web::Query<GameDetailQuery>,
) -> Result<HttpResponse> {
    let game_id = path.into_inner();
    let game = match catalog_service.get_game(game_id).await {
        Ok(Some(game)) => game,
        Ok(None) => return Ok(AppError::NotFound("Game not found.".into()).error_response()),
        Err(e) => return Ok(e.error_response()),
    };
    match catalog_service
        .effective_price_cents(&game, query.country_id)
        .await
    {
        Ok(price_cents) => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(GameResponse::with_price(game, price_cents)))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn catalog_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/games")
            .route("", web::get().to(list_games))
            .route("/{game_id}", web::get().to(get_game)),
    );
}
