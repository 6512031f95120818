use crate::models::*;
use crate::services::CartService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/cart/user/{user_id}",
    tag = "cart",
    params(
        ("user_id" = Uuid, Path, description = "User identifier")
    ),
    responses(
        (status = 200, description = "Current cart view, possibly empty", body = CartResponse)
    )
)]
pub async fn get_cart(
    cart_service: web::Data<CartService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    match cart_service.get_cart(user_id).await {
        Ok(cart) => Ok(HttpResponse::Ok().json(ApiResponse::success(cart))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/cart/user/{user_id}/items",
    tag = "cart",
    params(
        ("user_id" = Uuid, Path, description = "User identifier")
    ),
    request_body = AddCartItemRequest,
    responses(
        (status = 200, description = "Line added or quantity incremented", body = CartItemResponse),
        (status = 400, description = "Free-to-play, already owned, or bad quantity"),
        (status = 404, description = "Game not found")
    )
)]
pub async fn add_item(
    cart_service: web::Data<CartService>,
    path: web::Path<Uuid>,
    request: web::Json<AddCartItemRequest>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    match cart_service.add_item(user_id, &request).await {
        Ok(item) => Ok(HttpResponse::Ok().json(ApiResponse::success(item))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/cart/user/{user_id}/items/{item_id}",
    tag = "cart",
    params(
        ("user_id" = Uuid, Path, description = "User identifier"),
        ("item_id" = Uuid, Path, description = "Cart line identifier")
    ),
    request_body = UpdateCartItemRequest,
    responses(
        (status = 200, description = "Updated cart view", body = CartResponse),
        (status = 400, description = "Negative quantity"),
        (status = 404, description = "Cart or line not found")
    )
)]
pub async fn update_quantity(
    cart_service: web::Data<CartService>,
    path: web::Path<(Uuid, Uuid)>,
    request: web::Json<UpdateCartItemRequest>,
) -> Result<HttpResponse> {
    let (user_id, item_id) = path.into_inner();
    match cart_service
        .update_quantity(user_id, item_id, request.quantity)
        .await
    {
        Ok(cart) => Ok(HttpResponse::Ok().json(ApiResponse::success(cart))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/cart/user/{user_id}/items/{item_id}",
    tag = "cart",
    params(
        ("user_id" = Uuid, Path, description = "User identifier"),
        ("item_id" = Uuid, Path, description = "Cart line identifier")
    ),
    responses(
        (status = 204, description = "Line removed"),
        (status = 404, description = "Cart or line not found")
    )
)]
pub async fn remove_item(
    cart_service: web::Data<CartService>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (user_id, item_id) = path.into_inner();
    match cart_service.remove_item(user_id, item_id).await {
        Ok(()) => Ok(HttpResponse::NoContent().finish()),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/cart/user/{user_id}",
    tag = "cart",
    params(
        ("user_id" = Uuid, Path, description = "User identifier")
    ),
    responses(
        (status = 200, description = "Cart emptied"),
        (status = 404, description = "Cart not found")
    )
)]
pub async fn clear_cart(
    cart_service: web::Data<CartService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    match cart_service.clear(user_id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({"success": true}))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/cart/user/{user_id}/checkout",
    tag = "cart",
    params(
        ("user_id" = Uuid, Path, description = "User identifier")
    ),
    responses(
        (status = 200, description = "At least one line purchased", body = CheckoutResponse),
        (status = 400, description = "Empty cart or no line succeeded", body = CheckoutResponse)
    )
)]
pub async fn checkout(
    cart_service: web::Data<CartService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    match cart_service.checkout(user_id).await {
        Ok(result) if result.success => Ok(HttpResponse::Ok().json(ApiResponse::success(result))),
        Ok(result) => Ok(HttpResponse::BadRequest().json(json!({"success": false, "data": result}))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn cart_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/cart/user/{user_id}")
            .route("", web::get().to(get_cart))
            .route("", web::delete().to(clear_cart))
            .route("/items", web::post().to(add_item))
            .route("/items/{item_id}", web::put().to(update_quantity))
            .route("/items/{item_id}", web::delete().to(remove_item))
            .route("/checkout", web::post().to(checkout)),
    );
}
