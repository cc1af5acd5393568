//! System orchestration, startup, and shutdown logic.

mod storefront_system;
mod tracing;

pub use self::tracing::*;
pub use storefront_system::*;
