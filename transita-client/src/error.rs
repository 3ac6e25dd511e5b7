use thiserror::Error;
use transita_domain::DomainError;

/// Errors surfaced by the API client. Callers collapse these to one generic
/// user-facing message per operation; nothing here is fatal to the process.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connect, DNS, timeout)
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Token rejected by the server
    #[error("Unauthorized")]
    Unauthorized,

    /// Non-2xx response
    #[error("API error (status {status}): {message}")]
    Status { status: u16, message: String },

    /// Response body was not valid JSON
    #[error("Response parsing failed: {0}")]
    ResponseParseFailed(String),

    /// Payload outside the enumerated legacy shapes
    #[error(transparent)]
    Malformed(#[from] DomainError),

    /// Local precondition failure; never sent to the server
    #[error("Validation failed: {0}")]
    Validation(String),
}

pub type ApiResult<T> = Result<T, ApiError>;
