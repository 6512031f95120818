use crate::models::*;
use crate::services::PurchaseService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/purchases",
    tag = "purchase",
    params(
        ("user_id" = Uuid, Query, description = "Purchasing user")
    ),
    request_body = PurchaseRequest,
    responses(
        (status = 201, description = "Purchase recorded", body = PurchaseResponse),
        (status = 400, description = "Free-to-play, already owned, or covered by subscription"),
        (status = 404, description = "User or game not found"),
        (status = 409, description = "Lost a concurrent purchase race")
    )
)]
pub async fn create_purchase(
    purchase_service: web::Data<PurchaseService>,
    query: web::Query<PurchaseUserQuery>,
    request: web::Json<PurchaseRequest>,
) -> Result<HttpResponse> {
    match purchase_service
        .purchase(query.user_id, request.game_id)
        .await
    {
        Ok(purchase) => Ok(HttpResponse::Created().json(ApiResponse::success(purchase))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/purchases",
    tag = "purchase",
    params(
        ("user_id" = Uuid, Query, description = "User whose ledger to list"),
        ("page" = Option<u64>, Query, description = "Page number"),
        ("per_page" = Option<u64>, Query, description = "Page size")
    ),
    responses(
        (status = 200, description = "Purchase history, newest first")
    )
)]
pub async fn get_purchases(
    purchase_service: web::Data<PurchaseService>,
    query: web::Query<PurchaseHistoryQuery>,
) -> Result<HttpResponse> {
    let params = PaginationParams::new(query.page, query.per_page);
    match purchase_service.list_purchases(query.user_id, &params).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn purchase_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/purchases")
            .route("", web::post().to(create_purchase))
            .route("", web::get().to(get_purchases)),
    );
}
