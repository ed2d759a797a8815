pub mod config;
pub mod database;
pub mod entity;
pub mod error;
pub mod price_api;
pub mod price_history;
pub mod settings;
pub mod translate;

pub use config::Config;
pub use database::get_db_connection;
pub use entity::PriceObservation;
pub use error::{ConfigError, PriceError, SettingsError, StorageError};
pub use price_api::{CryptoCompareClient, PriceSource};
pub use price_history::{PriceHistoryStore, DEFAULT_HISTORY_LIMIT};
pub use settings::{SettingsRegistry, UserSettings};
pub use translate::{GoogleTranslator, Translate};
