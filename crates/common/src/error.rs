//! Common error types.

use thiserror::Error;

/// Main error type for tank icon rendering.
#[derive(Error, Debug)]
pub enum TankError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("No drawable 2D context for {0}")]
    MissingContext(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

pub type TankResult<T> = Result<T, TankError>;

impl TankError {
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn missing_context(surface: impl Into<String>) -> Self {
        Self::MissingContext(surface.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidOperation(msg.into())
    }

    /// Whether retrying the same render could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Io(_))
    }
}
