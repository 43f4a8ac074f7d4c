use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Authorization error: {0}")]
    Auth(String),

    #[error("Invalid time window: {0}")]
    InvalidWindow(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Watch history unavailable: {0}")]
    HistoryUnavailable(String),
}

pub type Result<T> = std::result::Result<T, Error>;
