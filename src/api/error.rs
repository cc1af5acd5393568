use thiserror::Error;

/// Failures talking to the storefront backend.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Transport(String),
    #[error("Credentials rejected (HTTP {0})")]
    Unauthorized(u16),
    #[error("Server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Request rejected (code {code}): {message}")]
    Rejected { code: i32, message: String },
    #[error("Invalid response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },
    #[error("Response from {0} carried no result")]
    MissingResult(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// Whether the error means the stored credential is no longer usable.
    pub fn is_credential_error(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }
}
