//! Request/response flow behind every bot interaction.
//!
//! Handlers translate Telegram updates into calls on [`QuoteService`] and deliver
//! the returned [`Reply`]. Settings are created on first contact, so no entry point
//! depends on `/start` having been sent.

use std::sync::Arc;

use shared::{PriceHistoryStore, PriceObservation, PriceSource, SettingsRegistry, UserSettings};
use tracing::{error, info, warn};

use crate::i18n::Localizer;
use crate::keyboards::{Keyboard, MenuAction, Reply, Selection};

/// The user behind an inbound event, as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: i64,
    pub language_code: Option<String>,
}

impl Caller {
    pub fn new(user_id: i64, language_code: Option<String>) -> Self {
        Self {
            user_id,
            language_code,
        }
    }

    fn language(&self) -> &str {
        self.language_code.as_deref().unwrap_or(shared::settings::DEFAULT_LANGUAGE)
    }
}

pub struct QuoteService {
    settings: Arc<SettingsRegistry>,
    store: PriceHistoryStore,
    prices: Arc<dyn PriceSource>,
    localizer: Localizer,
    assets: Vec<String>,
    currencies: Vec<String>,
}

impl QuoteService {
    pub fn new(
        settings: Arc<SettingsRegistry>,
        store: PriceHistoryStore,
        prices: Arc<dyn PriceSource>,
        localizer: Localizer,
        assets: Vec<String>,
        currencies: Vec<String>,
    ) -> Self {
        Self {
            settings,
            store,
            prices,
            localizer,
            assets,
            currencies,
        }
    }

    async fn settings_for(&self, who: &Caller) -> UserSettings {
        self.settings.get_or_create(who.user_id, who.language()).await
    }

    async fn main_menu(&self, language: &str) -> Keyboard {
        let mut labels = Vec::with_capacity(MenuAction::ALL.len());
        for action in MenuAction::ALL {
            labels.push(self.localizer.text(language, action.label_key()).await);
        }
        Keyboard::Menu(labels)
    }

    /// `/start`: settings go back to the defaults with the platform language.
    pub async fn start(&self, who: &Caller) -> Reply {
        let settings = self.settings.reset(who.user_id, who.language()).await;
        info!("User {} started with language '{}'", who.user_id, settings.language);

        let text = self.localizer.text(&settings.language, "welcome").await;
        Reply::with_keyboard(text, self.main_menu(&settings.language).await)
    }

    /// Free text from the reply keyboard.
    pub async fn menu_choice(&self, who: &Caller, text: &str) -> Reply {
        match MenuAction::from_text(text) {
            Some(MenuAction::ChooseAsset) => self.asset_menu(who).await,
            Some(MenuAction::ChooseCurrency) => self.currency_menu(who).await,
            Some(MenuAction::History) => self.history(who).await,
            Some(MenuAction::Price) => self.price(who).await,
            None => {
                let settings = self.settings_for(who).await;
                let text = self.localizer.text(&settings.language, "unknown_input").await;
                Reply::with_keyboard(text, self.main_menu(&settings.language).await)
            }
        }
    }

    pub async fn asset_menu(&self, who: &Caller) -> Reply {
        let settings = self.settings_for(who).await;
        let text = self.localizer.text(&settings.language, "choose_asset_prompt").await;
        let options = self.assets.iter().cloned().map(Selection::Asset).collect();
        Reply::with_keyboard(text, Keyboard::Options(options))
    }

    pub async fn currency_menu(&self, who: &Caller) -> Reply {
        let settings = self.settings_for(who).await;
        let text = self.localizer.text(&settings.language, "choose_currency_prompt").await;
        let options = self.currencies.iter().cloned().map(Selection::Currency).collect();
        Reply::with_keyboard(text, Keyboard::Options(options))
    }

    /// Inline button press. Options outside the configured lists are refused.
    pub async fn select(&self, who: &Caller, selection: Option<Selection>) -> Reply {
        let settings = self.settings_for(who).await;
        let language = settings.language.as_str();

        let (result, key) = match &selection {
            Some(Selection::Asset(symbol)) if self.assets.contains(symbol) => {
                (self.settings.set_asset(who.user_id, symbol).await, "asset_selected")
            }
            Some(Selection::Currency(code)) if self.currencies.contains(code) => {
                (self.settings.set_currency(who.user_id, code).await, "currency_selected")
            }
            _ => {
                warn!("User {} sent unsupported selection {:?}", who.user_id, selection);
                let text = self.localizer.text(language, "selection_unsupported").await;
                return Reply::text(text);
            }
        };

        if let Err(err) = result {
            warn!("Selection for user {} was not applied: {}", who.user_id, err);
            return Reply::text(self.localizer.text(language, "selection_unsupported").await);
        }

        info!("User {} selected {:?}", who.user_id, selection);
        let text = self.localizer.text(language, key).await;
        Reply::with_keyboard(text, self.main_menu(language).await)
    }

    /// Looks up the price for the user's current pair and records it.
    pub async fn price(&self, who: &Caller) -> Reply {
        let settings = self.settings_for(who).await;
        let language = settings.language.as_str();

        let price = match self.prices.fetch_price(&settings.asset, &settings.currency).await {
            Ok(price) => price,
            Err(err) => {
                warn!(
                    "No price for user {} ({}/{}): {}",
                    who.user_id, settings.asset, settings.currency, err
                );
                return Reply::text(self.localizer.text(language, "price_fetch_error").await);
            }
        };

        let formatted = format_price(price);
        let mut text = self
            .localizer
            .text_with(
                language,
                "price_current",
                &[
                    ("asset", settings.asset.as_str()),
                    ("price", formatted.as_str()),
                    ("currency", settings.currency.as_str()),
                ],
            )
            .await;

        if let Err(err) = self
            .store
            .append(who.user_id, &settings.asset, &settings.currency, price)
            .await
        {
            error!("Failed to store price observation for user {}: {}", who.user_id, err);
            text.push_str("\n\n");
            text.push_str(&self.localizer.text(language, "price_save_failed").await);
        }

        Reply::text(text)
    }

    /// Last ten lookups, newest first.
    pub async fn history(&self, who: &Caller) -> Reply {
        let settings = self.settings_for(who).await;
        let language = settings.language.as_str();

        let rows = match self.store.recent_default(who.user_id).await {
            Ok(rows) => rows,
            Err(err) => {
                error!("Failed to load history for user {}: {}", who.user_id, err);
                return Reply::text(self.localizer.text(language, "history_load_error").await);
            }
        };

        if rows.is_empty() {
            return Reply::text(self.localizer.text(language, "history_empty").await);
        }

        let title = self.localizer.text(language, "history_title").await;
        let timestamp_label = self.localizer.text(language, "history_timestamp").await;
        Reply::text(format_history(&title, &timestamp_label, &rows))
    }

    pub async fn help(&self, who: &Caller) -> Reply {
        let settings = self.settings_for(who).await;
        let language = settings.language.as_str();

        let mut text = self.localizer.text(language, "help_title").await;
        for (command, key) in [
            ("start", "help_start"),
            ("price", "help_price"),
            ("history", "help_history"),
            ("help", "help_help"),
            ("version", "help_version"),
        ] {
            text.push_str(&format!("\n/{} - {}", command, self.localizer.text(language, key).await));
        }
        Reply::text(text)
    }
}

/// Shortest representation that reads back as the same float: `50000.0`, `67123.45`.
pub fn format_price(price: f64) -> String {
    format!("{:?}", price)
}

fn format_history(title: &str, timestamp_label: &str, rows: &[PriceObservation]) -> String {
    let mut text = format!("{}\n", title);
    for row in rows {
        text.push_str(&format!(
            "{} -> {:.2} {}\n{} {}\n\n",
            row.crypto,
            row.price,
            row.currency,
            timestamp_label,
            row.timestamp.format("%d.%m.%Y %H:%M:%S")
        ));
    }
    text.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sea_orm::ConnectionTrait;
    use shared::{get_db_connection, CryptoCompareClient, PriceError, Translate};
    use std::sync::Mutex;
    use tempfile::TempDir;

    struct EchoTranslator;

    #[async_trait]
    impl Translate for EchoTranslator {
        async fn translate(&self, text: &str, target_language: &str) -> String {
            format!("[{}] {}", target_language, text)
        }
    }

    /// Answers every lookup with `price` (or a failure) and records the pairs asked for.
    struct MockPriceSource {
        price: Option<f64>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl MockPriceSource {
        fn new(price: Option<f64>) -> Self {
            Self {
                price,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PriceSource for MockPriceSource {
        async fn fetch_price(&self, asset: &str, currency: &str) -> Result<f64, PriceError> {
            self.calls
                .lock()
                .unwrap()
                .push((asset.to_string(), currency.to_string()));
            self.price.ok_or_else(|| PriceError::MalformedResponse {
                currency: currency.to_string(),
            })
        }
    }

    async fn temp_store() -> (TempDir, PriceHistoryStore) {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("bot.db").display());
        let db = get_db_connection(&url).await.unwrap();
        let store = PriceHistoryStore::new(Arc::new(db));
        store.initialize().await.unwrap();
        (dir, store)
    }

    fn service(store: PriceHistoryStore, prices: Arc<dyn PriceSource>) -> QuoteService {
        QuoteService::new(
            Arc::new(SettingsRegistry::new()),
            store,
            prices,
            Localizer::new(Arc::new(EchoTranslator)),
            vec!["BTC".to_string(), "ETH".to_string()],
            vec!["USD".to_string(), "EUR".to_string()],
        )
    }

    fn english(user_id: i64) -> Caller {
        Caller::new(user_id, Some("en".to_string()))
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(50000.0), "50000.0");
        assert_eq!(format_price(67123.45), "67123.45");
        assert_eq!(format_price(0.0821), "0.0821");
    }

    #[tokio::test]
    async fn test_price_without_start_records_default_pair() {
        let (_dir, store) = temp_store().await;
        let prices = Arc::new(MockPriceSource::new(Some(50000.0)));
        let service = service(store.clone(), prices.clone());

        let reply = service.price(&english(1)).await;

        assert!(reply.text.contains("50000.0"), "reply was: {}", reply.text);
        assert!(reply.text.contains("USD"));
        assert_eq!(prices.calls(), vec![("BTC".to_string(), "USD".to_string())]);

        let rows = store.recent_default(1).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].user_id, 1);
        assert_eq!(rows[0].crypto, "BTC");
        assert_eq!(rows[0].currency, "USD");
        assert_eq!(rows[0].price, 50000.0);
    }

    #[tokio::test]
    async fn test_price_through_cryptocompare_client() {
        use httpmock::prelude::*;

        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/data/price")
                    .query_param("fsym", "BTC")
                    .query_param("tsyms", "USD");
                then.status(200).json_body(serde_json::json!({ "USD": 50000.0 }));
            })
            .await;
        let client =
            CryptoCompareClient::with_config(server.url("/data/price"), "key".to_string(), 5).unwrap();

        let (_dir, store) = temp_store().await;
        let service = service(store.clone(), Arc::new(client));

        let reply = service.price(&english(2)).await;

        assert_eq!(reply.text, "Current price of BTC: 50000.0 USD");
        assert_eq!(store.recent_default(2).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_selected_currency_is_used_for_next_price() {
        let (_dir, store) = temp_store().await;
        let prices = Arc::new(MockPriceSource::new(Some(46000.5)));
        let service = service(store.clone(), prices.clone());
        let who = english(3);

        let reply = service.select(&who, Selection::parse("currency_EUR")).await;
        assert_eq!(reply.text, "Currency selected!");
        assert!(matches!(reply.keyboard, Some(Keyboard::Menu(_))));

        let reply = service.price(&who).await;

        assert!(reply.text.contains("EUR"));
        assert_eq!(prices.calls(), vec![("BTC".to_string(), "EUR".to_string())]);
        assert_eq!(store.recent_default(3).await.unwrap()[0].currency, "EUR");
    }

    #[tokio::test]
    async fn test_failed_lookup_writes_nothing() {
        let (_dir, store) = temp_store().await;
        let service = service(store.clone(), Arc::new(MockPriceSource::new(None)));

        let reply = service.price(&english(4)).await;

        assert_eq!(reply.text, "Error fetching data.");
        assert!(store.recent_default(4).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_selection_is_refused() {
        let (_dir, store) = temp_store().await;
        let prices = Arc::new(MockPriceSource::new(Some(1.0)));
        let service = service(store, prices.clone());
        let who = english(5);

        let reply = service.select(&who, Selection::parse("crypto_SHIB")).await;
        assert_eq!(reply.text, "This option is not available.");

        service.price(&who).await;
        assert_eq!(prices.calls(), vec![("BTC".to_string(), "USD".to_string())]);
    }

    #[tokio::test]
    async fn test_history_lists_recent_requests() {
        let (_dir, store) = temp_store().await;
        let service = service(store.clone(), Arc::new(MockPriceSource::new(Some(1.0))));
        let who = english(6);

        assert_eq!(service.history(&who).await.text, "Request history is empty.");

        store.append(6, "ETH", "EUR", 2500.5).await.unwrap();
        store.append(6, "BTC", "USD", 50000.0).await.unwrap();

        let text = service.history(&who).await.text;
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Recent requests:");
        assert_eq!(lines[1], "BTC -> 50000.00 USD");
        assert!(lines[2].starts_with("Date and time: "));
        assert_eq!(lines[4], "ETH -> 2500.50 EUR");
    }

    #[tokio::test]
    async fn test_start_resets_settings_and_shows_menu() {
        let (_dir, store) = temp_store().await;
        let prices = Arc::new(MockPriceSource::new(Some(1.0)));
        let service = service(store, prices.clone());
        let who = Caller::new(7, Some("ru".to_string()));

        service.select(&who, Selection::parse("crypto_ETH")).await;
        let reply = service.start(&who).await;

        assert_eq!(reply.text, "Добро пожаловать! Используйте меню для настройки.");
        match reply.keyboard {
            Some(Keyboard::Menu(labels)) => assert_eq!(labels[3], "📈 Получить цену"),
            other => panic!("expected main menu, got {:?}", other),
        }

        service.price(&who).await;
        assert_eq!(prices.calls(), vec![("BTC".to_string(), "USD".to_string())]);
    }

    #[tokio::test]
    async fn test_menu_text_routes_to_actions() {
        let (_dir, store) = temp_store().await;
        let service = service(store, Arc::new(MockPriceSource::new(Some(1.0))));
        let who = english(8);

        let reply = service.menu_choice(&who, "💰 Choose cryptocurrency").await;
        assert_eq!(reply.text, "Choose a cryptocurrency:");
        assert_eq!(
            reply.keyboard,
            Some(Keyboard::Options(vec![
                Selection::Asset("BTC".to_string()),
                Selection::Asset("ETH".to_string()),
            ]))
        );

        let reply = service.menu_choice(&who, "hello?").await;
        assert_eq!(reply.text, "Please use the menu buttons.");
    }

    #[tokio::test]
    async fn test_unknown_language_goes_through_translator() {
        let (_dir, store) = temp_store().await;
        let service = service(store, Arc::new(MockPriceSource::new(None)));

        let reply = service.price(&Caller::new(9, Some("de".to_string()))).await;
        assert_eq!(reply.text, "[de] Error fetching data.");
    }

    #[tokio::test]
    async fn test_missing_language_defaults_to_english() {
        let (_dir, store) = temp_store().await;
        let service = service(store, Arc::new(MockPriceSource::new(None)));

        let reply = service.help(&Caller::new(10, None)).await;
        assert!(reply.text.starts_with("Available commands:"));
        assert!(reply.text.contains("/history - your last ten requests"));
    }

    #[tokio::test]
    async fn test_price_is_shown_when_saving_fails() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("bot.db").display());
        let db = Arc::new(get_db_connection(&url).await.unwrap());
        let store = PriceHistoryStore::new(db.clone());
        store.initialize().await.unwrap();
        let service = service(store, Arc::new(MockPriceSource::new(Some(50000.0))));
        db.execute_unprepared("DROP TABLE crypto_prices").await.unwrap();

        let reply = service.price(&english(1)).await;

        assert!(reply.text.contains("50000.0"), "reply was: {}", reply.text);
        assert!(reply.text.contains("The request could not be saved to your history."));
    }

    #[tokio::test]
    async fn test_history_read_failure_shows_error_message() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("bot.db").display());
        let db = Arc::new(get_db_connection(&url).await.unwrap());
        let store = PriceHistoryStore::new(db.clone());
        store.initialize().await.unwrap();
        let service = service(store, Arc::new(MockPriceSource::new(Some(1.0))));
        db.execute_unprepared("DROP TABLE crypto_prices").await.unwrap();

        let reply = service.history(&english(1)).await;

        assert_eq!(
            reply.text,
            "Could not load your request history. Please try again later."
        );
    }
}
