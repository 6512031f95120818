use crate::models::*;
use crate::services::EntitlementService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/users/{user_id}/games/{game_id}/access",
    tag = "entitlement",
    params(
        ("user_id" = Uuid, Path, description = "User identifier"),
        ("game_id" = Uuid, Path, description = "Game identifier")
    ),
    responses(
        (status = 200, description = "Access classification; a missing game is a no_access result, not a 404", body = GameAccess)
    )
)]
pub async fn resolve_access(
    entitlement_service: web::Data<EntitlementService>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (user_id, game_id) = path.into_inner();
    match entitlement_service.resolve_access(user_id, game_id).await {
        Ok(access) => Ok(HttpResponse::Ok().json(ApiResponse::success(access))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/users/{user_id}/library",
    tag = "entitlement",
    params(
        ("user_id" = Uuid, Path, description = "User identifier")
    ),
    responses(
        (status = 200, description = "Free, owned, and subscription-covered games", body = LibraryResponse)
    )
)]
pub async fn get_library(
    entitlement_service: web::Data<EntitlementService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    match entitlement_service.resolve_library(user_id).await {
        Ok(library) => Ok(HttpResponse::Ok().json(ApiResponse::success(library))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn entitlement_config(cfg: &mut web::ServiceConfig) {
    cfg.route(
        "/users/{user_id}/games/{game_id}/access",
        web::get().to(resolve_access),
    )
    .route("/users/{user_id}/library", web::get().to(get_library));
}
