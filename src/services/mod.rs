pub mod cart_service;
pub mod catalog_service;
pub mod entitlement_service;
pub mod purchase_service;
pub mod subscription_service;
pub mod user_service;

pub use cart_service::*;
pub use catalog_service::*;
pub use entitlement_service::*;
pub use purchase_service::*;
pub use subscription_service::*;
pub use user_service::*;

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::database::DbConn;

    /// The full service graph wired the same way `main.rs` wires it.
    pub struct TestServices {
        pub catalog: CatalogService,
        pub users: UserService,
        pub subscriptions: SubscriptionService,
        pub entitlements: EntitlementService,
        pub purchases: PurchaseService,
        pub carts: CartService,
    }

    pub fn build(db: &DbConn) -> TestServices {
        let catalog = CatalogService::new(db.clone());
        let users = UserService::new(db.clone());
        let subscriptions = SubscriptionService::new(db.clone());
        let entitlements =
            EntitlementService::new(db.clone(), catalog.clone(), subscriptions.clone());
        let purchases = PurchaseService::new(
            db.clone(),
            catalog.clone(),
            users.clone(),
            entitlements.clone(),
        );
        let carts = CartService::new(
            db.clone(),
            catalog.clone(),
            entitlements.clone(),
            purchases.clone(),
        );
        TestServices {
            catalog,
            users,
            subscriptions,
            entitlements,
            purchases,
            carts,
        }
    }
}
