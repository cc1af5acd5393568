use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::api::ApiError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdminError {
    #[error("No editor is open")]
    NoEditor,
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    #[error("{0} records cannot be created here")]
    CreateUnsupported(&'static str),
    #[error("{0} records cannot be deleted")]
    DeleteUnsupported(&'static str),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Local(#[from] FrameworkError),
}
