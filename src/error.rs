use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::admin::AdminError;
use crate::api::ApiError;
use crate::cart::CartError;
use crate::checkout::CheckoutError;
use crate::config::ConfigError;
use crate::notifications::FeedError;
use crate::orders::OrderHistoryError;
use crate::payment::PaymentError;
use crate::session::{Route, SessionError};
use crate::storage::StorageError;

/// Every failure the storefront surfaces to its caller.
#[derive(Debug, Error)]
pub enum StorefrontError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Cart(#[from] CartError),
    #[error(transparent)]
    Checkout(#[from] CheckoutError),
    #[error(transparent)]
    Payment(#[from] PaymentError),
    #[error(transparent)]
    Orders(#[from] OrderHistoryError),
    #[error(transparent)]
    Feed(#[from] FeedError),
    #[error(transparent)]
    Admin(#[from] AdminError),
    #[error(transparent)]
    Local(#[from] FrameworkError),
    #[error("No product with id {0}")]
    UnknownProduct(String),
    #[error("Redirected to {0}")]
    Redirected(Route),
    #[error("Task failed: {0}")]
    TaskFailed(String),
}

pub type Result<T, E = StorefrontError> = std::result::Result<T, E>;
