use thiserror::Error;

#[derive(Debug, Error)]
pub enum Status {
    #[error("Incomplete credentials, need both client_id and client_secret")]
    MissingCredentials,
    #[error("No database URL specified anywhere (config: {0}), set NEON_DB_URL")]
    NoDatabase(String),
    #[error("Invalid table name {0:?}")]
    BadTableName(String),
    #[error("Invalid area {0}")]
    BadArea(String),
}
