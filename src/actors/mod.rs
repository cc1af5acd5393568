//! Long-running services. Each owns its state and is driven through a client
//! handle over a bounded channel.

mod cart_service;
mod feed_service;

pub use cart_service::*;
pub use feed_service::*;
