//! Per-user preferences kept for the lifetime of the process.
//!
//! Settings are not persisted: a restart resets every user to the defaults
//! while their price history survives in the database.

use std::collections::HashMap;

use tokio::sync::RwLock;

use crate::error::SettingsError;

pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_ASSET: &str = "BTC";
pub const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSettings {
    pub user_id: i64,
    pub language: String,
    pub asset: String,
    pub currency: String,
}

impl UserSettings {
    pub fn new(user_id: i64, language: &str) -> Self {
        let language = match language.trim() {
            "" => DEFAULT_LANGUAGE.to_string(),
            code => code.to_string(),
        };
        Self {
            user_id,
            language,
            asset: DEFAULT_ASSET.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
        }
    }
}

/// At most one entry per user id. Entries are never removed.
#[derive(Debug, Default)]
pub struct SettingsRegistry {
    entries: RwLock<HashMap<i64, UserSettings>>,
}

impl SettingsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored settings, creating defaults with `default_language` on first use.
    pub async fn get_or_create(&self, user_id: i64, default_language: &str) -> UserSettings {
        if let Some(existing) = self.entries.read().await.get(&user_id) {
            return existing.clone();
        }

        self.entries
            .write()
            .await
            .entry(user_id)
            .or_insert_with(|| UserSettings::new(user_id, default_language))
            .clone()
    }

    pub async fn get(&self, user_id: i64) -> Option<UserSettings> {
        self.entries.read().await.get(&user_id).cloned()
    }

    /// Replaces the entry with fresh defaults, as `/start` does.
    pub async fn reset(&self, user_id: i64, language: &str) -> UserSettings {
        let settings = UserSettings::new(user_id, language);
        self.entries.write().await.insert(user_id, settings.clone());
        settings
    }

    pub async fn set_asset(&self, user_id: i64, asset: &str) -> Result<(), SettingsError> {
        let mut entries = self.entries.write().await;
        let settings = entries
            .get_mut(&user_id)
            .ok_or(SettingsError::UnknownUser(user_id))?;
        settings.asset = asset.to_string();
        Ok(())
    }

    pub async fn set_currency(&self, user_id: i64, currency: &str) -> Result<(), SettingsError> {
        let mut entries = self.entries.write().await;
        let settings = entries
            .get_mut(&user_id)
            .ok_or(SettingsError::UnknownUser(user_id))?;
        settings.currency = currency.to_string();
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
