use std::sync::Arc;

use shared::{
    get_db_connection, Config, CryptoCompareClient, GoogleTranslator, PriceHistoryStore,
    SettingsRegistry,
};

use crate::i18n::Localizer;
use crate::services::quote_service::QuoteService;

pub type HandlerResult = Result<(), anyhow::Error>;

#[derive(Clone)]
pub struct AppState {
    pub bot_token: String,
    pub bot_name: String,
    pub quotes: Arc<QuoteService>,
}

impl AppState {
    pub async fn new() -> Result<Self, anyhow::Error> {
        let config = Config::from_env()?;

        let db = get_db_connection(&config.database_url).await?;
        let store = PriceHistoryStore::new(Arc::new(db));
        store.initialize().await?;
        tracing::info!("Connected to database successfully");

        let prices = CryptoCompareClient::with_config(
            config.price_api_url.clone(),
            config.price_api_key.clone(),
            config.price_api_timeout_secs,
        )?;
        let translator = GoogleTranslator::with_config(
            config.translate_api_url.clone(),
            config.translate_timeout_secs,
        )?;

        let quotes = QuoteService::new(
            Arc::new(SettingsRegistry::new()),
            store,
            Arc::new(prices),
            Localizer::new(Arc::new(translator)),
            config.supported_cryptocurrencies.clone(),
            config.supported_currencies.clone(),
        );

        Ok(AppState {
            bot_token: config.bot_token.clone(),
            bot_name: config.bot_name.clone(),
            quotes: Arc::new(quotes),
        })
    }
}
