use thiserror::Error;

#[derive(Debug, Error)]
pub enum NanoBananaError {
    #[error("{0}")]
    ValidationError(String),

    #[error("Missing API key. Set NANOBANANA_API_KEY on the server.")]
    MissingCredentialError,

    #[error("Upstream error {status}: {body}")]
    UpstreamError { status: u16, body: String },

    #[error("No image returned from API")]
    MissingImageError,

    #[error("Malformed image payload: {0}")]
    MalformedPayloadError(String),

    #[error("Request error: {0}")]
    RequestError(String),

    #[error("Response error: {0}")]
    ResponseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl NanoBananaError {
    /// True for the errors raised before any network call is made.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            NanoBananaError::ValidationError(_) | NanoBananaError::MissingCredentialError
        )
    }
}

pub type Result<T> = std::result::Result<T, NanoBananaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error_message_carries_status_and_body() {
        let err = NanoBananaError::UpstreamError {
            status: 500,
            body: "server exploded".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("500"));
        assert!(message.contains("server exploded"));
        assert!(!err.is_caller_error());
    }

    #[test]
    fn test_caller_errors() {
        assert!(NanoBananaError::ValidationError("empty".into()).is_caller_error());
        assert!(NanoBananaError::MissingCredentialError.is_caller_error());
        assert!(!NanoBananaError::MissingImageError.is_caller_error());
    }
}
