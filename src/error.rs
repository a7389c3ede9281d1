use thiserror::Error;

/// Errors that can occur while loading recipe pages
#[derive(Error, Debug)]
pub enum LoaderError {
    /// The URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to fetch the page
    #[error("Failed to fetch URL: {0}")]
    FetchError(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Unexpected HTTP status {status} for {url}")]
    HttpStatus { status: u16, url: String },

    /// The response carried no bytes
    #[error("Response body is empty")]
    EmptyBody,

    /// None of the candidate encodings produced a valid string
    #[error("Failed to decode page bytes")]
    EncodingFailed,

    /// No registered source matches the given name
    #[error("Unknown recipe source: {0}")]
    UnknownSource(String),

    /// The pagination controller refused the request
    #[error("Page {page} was not loaded: {reason}")]
    LoadRejected { page: u32, reason: &'static str },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}
