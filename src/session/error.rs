use thiserror::Error;

use crate::api::ApiError;
use crate::storage::StorageError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SessionError {
    #[error("Not signed in")]
    Missing,
    #[error("Malformed credential: {0}")]
    Malformed(String),
    #[error("Credential expired at {0}")]
    Expired(i64),
    #[error("Login failed: {0}")]
    Login(#[from] ApiError),
    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),
}
