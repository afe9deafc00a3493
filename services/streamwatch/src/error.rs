//! Error types for the streamwatch service

/// Errors that can occur in the streamwatch service
#[derive(Debug, thiserror::Error)]
pub enum StreamwatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Token exchange failed: {0}")]
    Auth(String),

    #[error("Twitch API rejected the access token: {0}")]
    Unauthorized(String),

    #[error("Stream status query failed: {0}")]
    Fetch(String),

    #[error("Notification delivery failed: {0}")]
    Notify(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for streamwatch operations
pub type Result<T> = std::result::Result<T, StreamwatchError>;
