use thiserror::Error;

/// Failures from the model-serving endpoint.
///
/// All variants are step-level: the calling turn fails and can be retried,
/// the process state is left untouched.
#[derive(Debug, Error)]
pub enum ModelError {
    /// HTTP 429 with the server-suggested wait.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Any other non-success HTTP status.
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Transport failure (DNS, refused connection, timeout).
    #[error("network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}
