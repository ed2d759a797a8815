use thiserror::Error;

/// Failures of the price-history log.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
    #[error("history limit must be a positive integer, got {0}")]
    InvalidLimit(u64),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("no settings registered for user {0}")]
    UnknownUser(i64),
}

/// Reasons a price lookup produced no price. All of them mean "no price available".
#[derive(Debug, Error)]
pub enum PriceError {
    #[error("price API request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("price API answered with HTTP {0}")]
    Status(u16),
    #[error("price API response has no numeric `{currency}` field")]
    MalformedResponse { currency: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
}
