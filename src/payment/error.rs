use thiserror::Error;

use crate::api::ApiError;
use crate::cart::CartError;
use crate::storage::StorageError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PaymentError {
    #[error("No order to pay for")]
    NoOrderContext,
    #[error("Payment could not be recorded: {0}")]
    Submit(ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Cart(#[from] CartError),
}
