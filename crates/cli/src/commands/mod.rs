//! Subcommand arguments and handlers.

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod orders;
pub mod session;
pub mod wishlist;

pub use admin::AdminAction;
pub use cart::CartAction;
pub use catalog::ProductsAction;
pub use checkout::AddressArgs;
pub use orders::OrdersAction;
pub use session::LoginArgs;
pub use wishlist::WishlistAction;
