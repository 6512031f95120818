use crate::error::AppError;
use crate::models::*;
use crate::services::SubscriptionService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/plans",
    tag = "subscription",
    responses(
        (status = 200, description = "All plans with pricing options and bundled games")
    )
)]
pub async fn list_plans(
    subscription_service: web::Data<SubscriptionService>,
) -> Result<HttpResponse> {
    match subscription_service.list_plans().await {
        Ok(plans) => Ok(HttpResponse::Ok().json(ApiResponse::success(plans))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/users/{user_id}/subscriptions",
    tag = "subscription",
    params(
        ("user_id" = Uuid, Path, description = "Subscribing user")
    ),
    request_body = SubscribeRequest,
    responses(
        (status = 201, description = "Subscription started", body = SubscriptionResponse),
        (status = 400, description = "A subscription is already active"),
        (status = 404, description = "User or pricing option not found")
    )
)]
pub async fn subscribe(
    subscription_service: web::Data<SubscriptionService>,
    path: web::Path<Uuid>,
    request: web::Json<SubscribeRequest>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    match subscription_service.subscribe(user_id, &request).await {
        Ok(subscription) => Ok(HttpResponse::Created().json(ApiResponse::success(subscription))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/users/{user_id}/subscriptions/active",
    tag = "subscription",
    params(
        ("user_id" = Uuid, Path, description = "User identifier")
    ),
    responses(
        (status = 200, description = "The currently active subscription", body = SubscriptionResponse),
        (status = 404, description = "No active subscription")
    )
)]
pub async fn get_active_subscription(
    subscription_service: web::Data<SubscriptionService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    match subscription_service.get_active_subscription(user_id).await {
        Ok(Some(active)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SubscriptionResponse::from_parts(active.subscription, &active.plan),
        ))),
        Ok(None) => Ok(AppError::NotFound("No active subscription.".into()).error_response()),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn subscription_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/plans").route("", web::get().to(list_plans)))
        .route("/users/{user_id}/subscriptions", web::post().to(subscribe))
        .route(
            "/users/{user_id}/subscriptions/active",
            web::get().to(get_active_subscription),
        );
}
