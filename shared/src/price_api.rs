//! CryptoCompare price lookups.
//!
//! One GET per lookup, no retries and no caching. Any failure is returned as a
//! [`PriceError`] value for the caller to report.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use crate::error::PriceError;

pub const CRYPTOCOMPARE_PRICE_URL: &str = "https://min-api.cryptocompare.com/data/price";

#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Current price of one unit of `asset` expressed in `currency`.
    async fn fetch_price(&self, asset: &str, currency: &str) -> Result<f64, PriceError>;
}

#[derive(Debug, Clone)]
pub struct CryptoCompareClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl CryptoCompareClient {
    pub fn new(api_key: String) -> Result<Self, PriceError> {
        Self::with_config(CRYPTOCOMPARE_PRICE_URL.to_string(), api_key, 10)
    }

    pub fn with_config(base_url: String, api_key: String, timeout_secs: u64) -> Result<Self, PriceError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }

    async fn request(&self, asset: &str, currency: &str) -> Result<f64, PriceError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("fsym", asset), ("tsyms", currency), ("api_key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PriceError::Status(status.as_u16()));
        }

        let body: Value = response.json().await?;
        if let Some(message) = body.get("Message").and_then(Value::as_str) {
            warn!("CryptoCompare rejected {}/{}: {}", asset, currency, message);
        }
        extract_price(&body, currency)
    }
}

#[async_trait]
impl PriceSource for CryptoCompareClient {
    async fn fetch_price(&self, asset: &str, currency: &str) -> Result<f64, PriceError> {
        let result = self.request(asset, currency).await;
        if let Err(ref err) = result {
            warn!("Price lookup for {}/{} failed: {}", asset, currency, err);
        }
        result
    }
}

/// Reads the numeric field named exactly like `currency` (`{"USD": 67123.45}`).
fn extract_price(body: &Value, currency: &str) -> Result<f64, PriceError> {
    body.get(currency)
        .and_then(Value::as_f64)
        .ok_or_else(|| PriceError::MalformedResponse {
            currency: currency.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> CryptoCompareClient {
        CryptoCompareClient::with_config(server.url("/data/price"), "test-key".to_string(), 5).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_price_reads_currency_field() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/data/price")
                    .query_param("fsym", "BTC")
                    .query_param("tsyms", "USD")
                    .query_param("api_key", "test-key");
                then.status(200).json_body(json!({ "USD": 67123.45 }));
            })
            .await;

        let price = client_for(&server).fetch_price("BTC", "USD").await.unwrap();

        assert_eq!(price, 67123.45);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_field_is_malformed() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/data/price");
                then.status(200).json_body(json!({}));
            })
            .await;

        let result = client_for(&server).fetch_price("BTC", "USD").await;
        assert!(matches!(result, Err(PriceError::MalformedResponse { ref currency }) if currency == "USD"));
    }

    #[tokio::test]
    async fn test_api_error_payload_is_malformed() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/data/price");
                then.status(200)
                    .json_body(json!({ "Response": "Error", "Message": "There is no data for the symbol XYZ ." }));
            })
            .await;

        let result = client_for(&server).fetch_price("XYZ", "USD").await;
        assert!(matches!(result, Err(PriceError::MalformedResponse { .. })));
    }

    #[tokio::test]
    async fn test_non_success_status_is_reported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/data/price");
                then.status(503);
            })
            .await;

        let result = client_for(&server).fetch_price("BTC", "USD").await;
        assert!(matches!(result, Err(PriceError::Status(503))));
    }

    #[tokio::test]
    async fn test_unreachable_api_is_network_error() {
        let client =
            CryptoCompareClient::with_config("http://127.0.0.1:9/data/price".to_string(), String::new(), 2).unwrap();

        let result = client.fetch_price("BTC", "USD").await;
        assert!(matches!(result, Err(PriceError::Network(_))));
    }

    #[test]
    fn test_extract_price_rejects_non_numeric() {
        let body = json!({ "USD": "67123.45" });
        assert!(extract_price(&body, "USD").is_err());
        assert_eq!(extract_price(&json!({ "EUR": 3 }), "EUR").unwrap(), 3.0);
    }
}
