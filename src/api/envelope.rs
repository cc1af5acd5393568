use serde::Deserialize;

use super::ApiError;

/// Code the identity service uses for a successful call.
pub const SUCCESS_CODE: i32 = 1000;

/// Wrapper every backend response is delivered in.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub code: Option<i32>,
    pub message: Option<String>,
    pub result: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Returns the payload, treating a missing `result` as an error.
    pub fn into_result(self, endpoint: &str) -> Result<T, ApiError> {
        self.result.ok_or_else(|| ApiError::MissingResult(endpoint.to_string()))
    }

    /// Like [`into_result`](Self::into_result) but also rejects envelopes whose
    /// `code` is present and differs from [`SUCCESS_CODE`].
    pub fn into_checked_result(self, endpoint: &str) -> Result<T, ApiError> {
        match self.code {
            Some(code) if code != SUCCESS_CODE => Err(ApiError::Rejected {
                code,
                message: self.message.unwrap_or_default(),
            }),
            _ => self.into_result(endpoint),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Token {
        token: String,
    }

    #[test]
    fn rejects_non_success_code() {
        let envelope: ApiEnvelope<Token> =
            serde_json::from_str(r#"{"code":1005,"message":"User not existed"}"#).unwrap();
        assert_eq!(
            envelope.into_checked_result("identity/auth/token"),
            Err(ApiError::Rejected { code: 1005, message: "User not existed".into() })
        );
    }

    #[test]
    fn missing_result_is_an_error() {
        let envelope: ApiEnvelope<Vec<Token>> = serde_json::from_str(r#"{"code":1000}"#).unwrap();
        assert_eq!(
            envelope.into_result("product/list"),
            Err(ApiError::MissingResult("product/list".into()))
        );
    }

    #[test]
    fn success_yields_payload() {
        let envelope: ApiEnvelope<Token> =
            serde_json::from_str(r#"{"code":1000,"result":{"token":"t"}}"#).unwrap();
        assert_eq!(envelope.into_checked_result("x").unwrap(), Token { token: "t".into() });
    }
}
