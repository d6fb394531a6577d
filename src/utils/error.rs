use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from I/O operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from JSON serialization/deserialization
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Network interface enumeration failed
    #[error("Network query error: {0}")]
    NetworkError(String),

    /// Preference store could not be read or written
    #[error("Preference error: {0}")]
    PreferenceError(String),

    /// Unknown dump mode key
    #[error("Unknown dump mode: {0}")]
    InvalidDumpMode(String),

    /// The status event loop is no longer accepting events
    #[error("Event channel closed: {0}")]
    ChannelClosed(String),
}

/// Result type for application
pub type AppResult<T> = Result<T, AppError>;
