// Error types for the news dashboard library.
// The binary and the interactive loop wrap these in `anyhow`; library code
// returns them directly.

use crate::storage::StorageError;
use thiserror::Error;

/// Library error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("NEWS_API_KEY not found or invalid. Please set it in your .env file.")]
    MissingApiKey,

    #[error("Invalid API key. Please check NEWS_API_KEY.")]
    InvalidApiKey,

    #[error("Rate limit exceeded. Please wait before making more requests.")]
    RateLimited,

    #[error("Request timed out. Please check your internet connection.")]
    Timeout,

    #[error("Connection error. Please check your internet connection.")]
    Connection,

    #[error("HTTP error: {0}")]
    Status(reqwest::StatusCode),

    #[error("API error [{code}]: {message}")]
    Api { code: String, message: String },

    #[error("Invalid category '{0}'. Must be one of: business, entertainment, general, health, science, sports, technology")]
    InvalidCategory(String),

    #[error("Search query cannot be empty")]
    EmptyQuery,

    #[error("At least one source must be specified")]
    NoSources,

    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),

    #[error("Unexpected response from the news API: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Timeout
        } else if e.is_connect() {
            Error::Connection
        } else {
            Error::Http(e)
        }
    }
}

/// Result type alias for the news dashboard library
pub type Result<T> = std::result::Result<T, Error>;
