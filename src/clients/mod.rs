//! Cloneable handles to the long-running services.

#[macro_use]
mod macros;

mod cart_client;
mod feed_client;

pub use cart_client::*;
pub use feed_client::*;
