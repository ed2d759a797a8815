//! Platform-neutral replies and the keyboards attached to them.

use teloxide::types::{
    InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup, ReplyMarkup,
};

const ASSET_PREFIX: &str = "crypto_";
const CURRENCY_PREFIX: &str = "currency_";

/// Main menu entries. Free text is matched by the leading emoji so translated
/// labels keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    ChooseAsset,
    ChooseCurrency,
    History,
    Price,
}

impl MenuAction {
    pub const ALL: [MenuAction; 4] = [
        MenuAction::ChooseAsset,
        MenuAction::ChooseCurrency,
        MenuAction::History,
        MenuAction::Price,
    ];

    pub fn label_key(self) -> &'static str {
        match self {
            MenuAction::ChooseAsset => "menu_choose_asset",
            MenuAction::ChooseCurrency => "menu_choose_currency",
            MenuAction::History => "menu_history",
            MenuAction::Price => "menu_price",
        }
    }

    fn marker(self) -> &'static str {
        match self {
            MenuAction::ChooseAsset => "💰",
            MenuAction::ChooseCurrency => "💵",
            MenuAction::History => "📜",
            MenuAction::Price => "📈",
        }
    }

    pub fn from_text(text: &str) -> Option<Self> {
        let text = text.trim_start();
        Self::ALL.into_iter().find(|action| text.starts_with(action.marker()))
    }
}

/// Inline button payloads: `crypto_<SYMBOL>` and `currency_<CODE>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Asset(String),
    Currency(String),
}

impl Selection {
    pub fn parse(data: &str) -> Option<Self> {
        if let Some(symbol) = data.strip_prefix(ASSET_PREFIX) {
            (!symbol.is_empty()).then(|| Selection::Asset(symbol.to_string()))
        } else if let Some(code) = data.strip_prefix(CURRENCY_PREFIX) {
            (!code.is_empty()).then(|| Selection::Currency(code.to_string()))
        } else {
            None
        }
    }

    pub fn callback_data(&self) -> String {
        match self {
            Selection::Asset(symbol) => format!("{}{}", ASSET_PREFIX, symbol),
            Selection::Currency(code) => format!("{}{}", CURRENCY_PREFIX, code),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// Reply keyboard, two labels per row.
    Menu(Vec<String>),
    /// One inline button per option.
    Options(Vec<Selection>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl Reply {
    pub fn text(text: String) -> Self {
        Self { text, keyboard: None }
    }

    pub fn with_keyboard(text: String, keyboard: Keyboard) -> Self {
        Self {
            text,
            keyboard: Some(keyboard),
        }
    }
}

pub fn to_markup(keyboard: &Keyboard) -> ReplyMarkup {
    match keyboard {
        Keyboard::Menu(labels) => {
            let rows: Vec<Vec<KeyboardButton>> = labels
                .chunks(2)
                .map(|row| row.iter().map(|label| KeyboardButton::new(label.clone())).collect())
                .collect();
            ReplyMarkup::Keyboard(KeyboardMarkup::new(rows).resize_keyboard())
        }
        Keyboard::Options(options) => {
            let rows: Vec<Vec<InlineKeyboardButton>> = options
                .iter()
                .map(|option| {
                    let label = match option {
                        Selection::Asset(symbol) => symbol.clone(),
                        Selection::Currency(code) => code.clone(),
                    };
                    vec![InlineKeyboardButton::callback(label, option.callback_data())]
                })
                .collect();
            ReplyMarkup::InlineKeyboard(InlineKeyboardMarkup::new(rows))
        }
    }
}
