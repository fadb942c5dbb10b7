use thiserror::Error;

/// Application-wide error types for newswire.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request timed out (the unified per-request timeout, redirects included).
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Connection-level failure (DNS, refused, reset, interrupted body read).
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Non-success HTTP status on the final response.
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// JSON serialization/deserialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Queue, marker-set, or store operation failed.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Missing or invalid configuration.
    #[error("Config error: {0}")]
    ConfigError(String),
}
