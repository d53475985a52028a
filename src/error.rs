use thiserror::Error;

/// Errors surfaced by the recipe finder outside of a resolved `RecipeRecord`
#[derive(Error, Debug)]
pub enum ResolveError {
    /// HTTP client could not be constructed or a request failed outright
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Generative provider could not be created
    #[error("Provider error: {0}")]
    ProviderError(#[from] ProviderError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    /// A newer resolution was submitted before this one finished
    #[error("Resolution superseded by a newer request")]
    Superseded,
}

/// Errors returned by a generative text service
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("API request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API returned error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("All providers failed:\n{0}")]
    Exhausted(String),
}

/// Errors returned by the structured recipe database
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Failed to fetch from recipe database: {0}")]
    FetchError(#[from] reqwest::Error),

    #[error("Recipe database returned error: {status}")]
    ApiError { status: u16 },

    #[error("Failed to parse recipe database response: {0}")]
    ParseError(String),

    #[error("Recipe database did not answer within {0} seconds")]
    Timeout(u64),
}
