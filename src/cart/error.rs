use thiserror::Error;

use crate::storage::StorageError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("Product {name} ({product_id}) is out of stock")]
    OutOfStock { product_id: String, name: String },
    #[error("Product not in cart: {0}")]
    NotInCart(String),
    #[error("Cart mirror error: {0}")]
    Mirror(#[from] StorageError),
    #[error("Cart service unavailable: {0}")]
    ServiceUnavailable(String),
}
