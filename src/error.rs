use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    InvalidInput(String),

    #[error("User not found on GitHub.")]
    UserNotFound,

    #[error("GitHub API rate limit exceeded. Please add a GITHUB_TOKEN to your server .env file.")]
    RateLimited,

    #[error("GitHub API error: {0}")]
    Upstream(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

pub type Result<T> = std::result::Result<T, Error>;
