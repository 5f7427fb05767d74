//! Error types for the navigation shell

use thiserror::Error;

/// Main error type for navigation operations
#[derive(Error, Debug)]
pub enum NavError {
    #[error("Panel '{0}' is not part of the navigation layout")]
    UnknownPanel(String),

    #[error("Element '{0}' not found in document")]
    MissingElement(String),

    #[error("Nested submenu '{0}' is not part of the navigation layout")]
    UnknownSubmenu(String),

    #[error("Panel '{0}' has no mobile entry")]
    NoMobileEntry(String),

    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type for navigation operations
pub type NavResult<T> = Result<T, NavError>;
