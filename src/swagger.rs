use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::catalog::list_games,
        handlers::catalog::get_game,
        handlers::cart::get_cart,
        handlers::cart::add_item,
        handlers::cart::update_quantity,
        handlers::cart::remove_item,
        handlers::cart::clear_cart,
        handlers::cart::checkout,
        handlers::entitlement::resolve_access,
        handlers::entitlement::get_library,
        handlers::purchase::create_purchase,
        handlers::purchase::get_purchases,
        handlers::subscription::list_plans,
        handlers::subscription::subscribe,
        handlers::subscription::get_active_subscription,
    ),
    components(
        schemas(
            GameResponse,
            GameQuery,
            GameDetailQuery,
            CartResponse,
            CartItemResponse,
            AddCartItemRequest,
            UpdateCartItemRequest,
            CheckoutResponse,
            GameAccess,
            LibraryEntry,
            LibraryResponse,
            PurchaseRequest,
            PurchaseResponse,
            SubscribeRequest,
            PlanResponse,
            PlanPricingOptionResponse,
            SubscriptionResponse,
            ApiError,
        )
    ),
    tags(
        (name = "catalog", description = "Catalog browsing API"),
        (name = "cart", description = "Shopping cart API"),
        (name = "entitlement", description = "Game access resolution API"),
        (name = "purchase", description = "Purchase ledger API"),
        (name = "subscription", description = "Subscription plan API"),
    ),
    info(
        title = "GameVault Backend API",
        version = "1.0.0",
        description = "Storefront backend REST API documentation",
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
