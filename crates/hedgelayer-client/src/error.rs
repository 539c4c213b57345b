use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Non-2xx response; message is the server's `error`/`message` field when
    /// the body is JSON, the raw body otherwise.
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid base URL or header value: {0}")]
    Setup(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;
