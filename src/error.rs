/// Errors raised by the API client, request validation and configuration.
///
/// Text normalization never fails and has no variant here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid request: {reason}")]
    InvalidRequest { reason: String },

    #[error("no active case: run a recommendation or pass a case id first")]
    MissingSession,

    #[error("request failed: {reason}")]
    Transport { reason: String },

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("unexpected response: {reason}")]
    InvalidResponse { reason: String },

    #[error("invalid configuration: {reason}")]
    Config { reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode JSON")]
    Json(#[from] serde_json::Error),
}
