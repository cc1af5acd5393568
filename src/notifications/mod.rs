//! Server-pushed notifications: SSE framing, the live subscription and the
//! error type shared by the feed service.

mod sse;
mod subscription;

pub use sse::*;
pub use subscription::*;

use thiserror::Error;

use crate::api::ApiError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FeedError {
    #[error("Notification backend error: {0}")]
    Api(#[from] ApiError),
    #[error("Notification feed unavailable: {0}")]
    ServiceUnavailable(String),
}
