pub mod cart_items;
pub mod carts;
pub mod country_prices;
pub mod games;
pub mod plan_games;
pub mod plan_pricing_options;
pub mod purchases;
pub mod subscription_plans;
pub mod user_subscriptions;
pub mod users;

pub use cart_items as cart_item_entity;
pub use carts as cart_entity;
pub use country_prices as country_price_entity;
pub use games as game_entity;
pub use plan_games as plan_game_entity;
pub use plan_pricing_options as plan_pricing_option_entity;
pub use purchases as purchase_entity;
pub use subscription_plans as subscription_plan_entity;
pub use user_subscriptions as user_subscription_entity;
pub use users as user_entity;
