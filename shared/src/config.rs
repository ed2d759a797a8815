use dotenv::dotenv;

use crate::error::ConfigError;

pub const DEFAULT_CRYPTOCURRENCIES: &[&str] = &["BTC", "ETH", "BNB", "SOL", "XRP", "ADA", "DOGE", "LTC"];
pub const DEFAULT_CURRENCIES: &[&str] = &["USD", "EUR", "RUB", "GBP", "JPY", "CNY"];

#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    pub bot_name: String,
    pub database_url: String,
    pub price_api_url: String,
    pub price_api_key: String,
    pub price_api_timeout_secs: u64,
    pub translate_api_url: String,
    pub translate_timeout_secs: u64,
    pub supported_cryptocurrencies: Vec<String>,
    pub supported_currencies: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenv().ok();

        Ok(Config {
            bot_token: std::env::var("BOT_TOKEN").map_err(|_| ConfigError::Missing("BOT_TOKEN"))?,
            bot_name: std::env::var("BOT_NAME").unwrap_or_else(|_| "CryptoPriceBot".to_string()),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://crypto_data.db?mode=rwc".to_string()),
            price_api_url: std::env::var("PRICE_API_URL")
                .unwrap_or_else(|_| crate::price_api::CRYPTOCOMPARE_PRICE_URL.to_string()),
            price_api_key: std::env::var("CRYPTOCOMPARE_API_KEY").unwrap_or_default(),
            price_api_timeout_secs: parse_secs(std::env::var("PRICE_API_TIMEOUT_SECS").ok(), 10),
            translate_api_url: std::env::var("TRANSLATE_API_URL")
                .unwrap_or_else(|_| crate::translate::GOOGLE_TRANSLATE_URL.to_string()),
            translate_timeout_secs: parse_secs(std::env::var("TRANSLATE_TIMEOUT_SECS").ok(), 10),
            supported_cryptocurrencies: parse_symbol_list(
                std::env::var("SUPPORTED_CRYPTOCURRENCIES").ok(),
                DEFAULT_CRYPTOCURRENCIES,
            ),
            supported_currencies: parse_symbol_list(
                std::env::var("SUPPORTED_CURRENCIES").ok(),
                DEFAULT_CURRENCIES,
            ),
        })
    }
}

fn parse_secs(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|v| v.trim().parse().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(default)
}

/// Parses a comma separated symbol list ("btc, eth,,SOL" -> ["BTC", "ETH", "SOL"]).
/// Falls back to `defaults` when the variable is unset or holds no symbols.
pub fn parse_symbol_list(raw: Option<String>, defaults: &[&str]) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::new();
    for symbol in raw.unwrap_or_default().split(',') {
        let symbol = symbol.trim().to_uppercase();
        if !symbol.is_empty() && !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }

    if symbols.is_empty() {
        defaults.iter().map(|s| s.to_string()).collect()
    } else {
        symbols
    }
}
