//! Error types for Prepdesk.

use thiserror::Error;

/// Library-level error type for Prepdesk operations.
#[derive(Error, Debug)]
pub enum PrepdeskError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Question store error: {0}")]
    Store(String),

    #[error("Question with ID {0} not found")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Import failed: {0}")]
    Import(String),

    #[error("Price feed error: {0}")]
    PriceFeed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Agent error: {0}")]
    Agent(String),
}

/// Result type alias for Prepdesk operations.
pub type Result<T> = std::result::Result<T, PrepdeskError>;
