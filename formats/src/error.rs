use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum FormatError {
    #[error("Invalid payload, can not decode: {0}")]
    BadPayload(String),
    #[error("Invalid row #{0}: {1}")]
    BadRow(usize, String),
}
