//! Best-effort machine translation.
//!
//! Translation never fails from the caller's point of view: on any error the
//! input text is returned unchanged and the failure is logged.

use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

pub const GOOGLE_TRANSLATE_URL: &str = "https://translate.googleapis.com";

#[async_trait]
pub trait Translate: Send + Sync {
    async fn translate(&self, text: &str, target_language: &str) -> String;
}

#[derive(Debug, Clone)]
pub struct GoogleTranslator {
    base_url: String,
    client: reqwest::Client,
}

impl GoogleTranslator {
    pub fn new() -> Result<Self> {
        Self::with_config(GOOGLE_TRANSLATE_URL.to_string(), 10)
    }

    pub fn with_config(base_url: String, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { base_url, client })
    }

    async fn request(&self, text: &str, target_language: &str) -> Result<String> {
        let url = format!("{}/translate_a/single", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target_language),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        join_segments(&body)
    }
}

#[async_trait]
impl Translate for GoogleTranslator {
    async fn translate(&self, text: &str, target_language: &str) -> String {
        if text.trim().is_empty() || target_language.trim().is_empty() {
            return text.to_string();
        }

        match self.request(text, target_language).await {
            Ok(translated) => translated,
            Err(err) => {
                warn!("Translation to '{}' failed, keeping original text: {}", target_language, err);
                text.to_string()
            }
        }
    }
}

/// The endpoint answers `[[["translated", "source", ...], ...], ...]`; the
/// translated pieces of every segment are concatenated.
fn join_segments(body: &Value) -> Result<String> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("unexpected translation payload"))?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if translated.is_empty() {
        return Err(anyhow!("translation payload holds no text"));
    }
    Ok(translated)
}
