//! User-facing text.
//!
//! Phrases come from the `locales/` catalogue. Languages without a catalogue get
//! the English phrase passed through the translation service, which falls back to
//! English on failure.

use std::sync::Arc;

use shared::Translate;

pub const SOURCE_LOCALE: &str = "en";

/// Primary language subtag in lower case: "pt-BR" -> "pt".
pub fn primary_language(code: &str) -> String {
    let primary = code.split(['-', '_']).next().unwrap_or_default().trim();
    if primary.is_empty() {
        SOURCE_LOCALE.to_string()
    } else {
        primary.to_lowercase()
    }
}

pub fn has_catalogue(language: &str) -> bool {
    rust_i18n::available_locales!().iter().any(|l| *l == language)
}

/// Raw catalogue phrase with `%{name}` placeholders filled in.
pub fn phrase(locale: &str, key: &str, args: &[(&str, &str)]) -> String {
    let mut text = rust_i18n::t!(key, locale = locale).into_owned();
    for (name, value) in args {
        text = text.replace(&format!("%{{{}}}", name), value);
    }
    text
}

#[derive(Clone)]
pub struct Localizer {
    translator: Arc<dyn Translate>,
}

impl Localizer {
    pub fn new(translator: Arc<dyn Translate>) -> Self {
        Self { translator }
    }

    pub async fn text(&self, language: &str, key: &str) -> String {
        self.text_with(language, key, &[]).await
    }

    pub async fn text_with(&self, language: &str, key: &str, args: &[(&str, &str)]) -> String {
        let language = primary_language(language);
        if has_catalogue(&language) {
            return phrase(&language, key, args);
        }

        let source = phrase(SOURCE_LOCALE, key, args);
        self.translator.translate(&source, &language).await
    }
}
