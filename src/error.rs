use thiserror::Error;

/// Errors that can occur while talking to the recipe API or driving the views
#[derive(Error, Debug)]
pub enum BrowserError {
    /// Transport failure (connect, timeout, body read)
    #[error("Failed to fetch from recipe API: {0}")]
    Fetch(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("Recipe API returned status {status} for {url}")]
    Status { status: u16, url: String },

    /// The response body was not the expected JSON envelope
    #[error("Failed to parse API response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// A path that does not name one of the views
    #[error("Unknown route: {0}")]
    InvalidRoute(String),

    #[error("Unknown sort key '{0}' (expected name, category or area)")]
    InvalidSortKey(String),

    #[error("Unknown sort order '{0}' (expected asc or desc)")]
    InvalidSortOrder(String),

    /// Bad command-line invocation
    #[error("{0}")]
    Usage(String),
}
