pub mod cart;
pub mod catalog;
pub mod entitlement;
pub mod purchase;
pub mod subscription;

pub use cart::cart_config;
pub use catalog::catalog_config;
pub use entitlement::entitlement_config;
pub use purchase::purchase_config;
pub use subscription::subscription_config;
