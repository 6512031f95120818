pub mod cart;
pub mod common;
pub mod entitlement;
pub mod game;
pub mod pagination;
pub mod purchase;
pub mod subscription;

pub use cart::*;
pub use common::*;
pub use entitlement::*;
pub use game::*;
pub use pagination::*;
pub use purchase::*;
pub use subscription::*;
