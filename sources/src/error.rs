use thiserror::Error;

use airwatch_formats::FormatError;

/// Custom error type for tokens, allow us to differentiate between errors.
///
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Bad parameter {0}")]
    BadParam(String),
    #[error("Decoding token: {0}")]
    Decoding(String),
    #[error("HTTP Error: {0}")]
    HTTP(String),
    #[error("Credentials rejected ({0}): {1}")]
    Rejected(u16, String),
}

/// Everything that can go wrong after we got a token.
///
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP Error: {0}")]
    HTTP(String),
    #[error("Bad status {0}: {1}")]
    Status(u16, String),
    #[error(transparent)]
    Format(#[from] FormatError),
}
