use thiserror::Error;

/// Main error type for the card engine.
///
/// "No results" is not an error anywhere in this crate; an empty ordered
/// sequence is a valid outcome. Store failures pass through unchanged.
#[derive(Error, Debug)]
pub enum CardEngineError {
    /// Database errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl From<String> for CardEngineError {
    fn from(s: String) -> Self {
        CardEngineError::Other(s)
    }
}

impl From<&str> for CardEngineError {
    fn from(s: &str) -> Self {
        CardEngineError::Other(s.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CardEngineError>;
