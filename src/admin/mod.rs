//! Admin CRUD screens for products, orders, users and delivery statuses.

mod backend;
mod dashboard;
mod error;
mod screen;

pub use backend::*;
pub use dashboard::*;
pub use error::*;
pub use screen::*;

use crate::domain::{DeliveryStatus, OrderSummary, Product, User};

pub type ProductScreen = AdminScreen<Product, RemoteProducts>;
pub type OrderScreen = AdminScreen<OrderSummary, RemoteOrders>;
pub type UserScreen = AdminScreen<User, LocalBackend<User>>;
pub type DeliveryScreen = AdminScreen<DeliveryStatus, LocalBackend<DeliveryStatus>>;
