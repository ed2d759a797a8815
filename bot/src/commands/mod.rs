use std::sync::Arc;
use std::time::Instant;

use teloxide::prelude::*;
use teloxide::types::User;
use teloxide::utils::command::BotCommands;

use crate::keyboards::{self, Reply};
use crate::services::quote_service::Caller;
use crate::state::{AppState, HandlerResult};

pub mod admin;
pub mod menu;
pub mod price;
pub mod start;

pub use admin::handle_version;
pub use menu::{handle_menu_text, handle_selection_callback};
pub use price::{handle_history, handle_price};
pub use start::handle_start;

/// 📈 CryptoPrice bot commands
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    /// Start the bot and show the menu
    Start,
    /// Current price for your selected pair
    Price,
    /// Your last ten price requests
    History,
    /// Show available commands
    Help,
    /// Build information
    Version,
}

impl From<&User> for Caller {
    fn from(user: &User) -> Self {
        Caller::new(user.id.0 as i64, user.language_code.clone())
    }
}

/// Sends `reply` with its keyboard, if any.
pub async fn deliver(bot: &Bot, chat_id: ChatId, reply: Reply) -> HandlerResult {
    let mut request = bot.send_message(chat_id, reply.text);
    if let Some(keyboard) = reply.keyboard.as_ref() {
        request = request.reply_markup(keyboards::to_markup(keyboard));
    }
    request.await?;
    Ok(())
}

pub async fn handle_help(bot: Bot, msg: Message, state: Arc<AppState>) -> HandlerResult {
    let start_time = Instant::now();
    let Some(who) = msg.from.as_ref().map(Caller::from) else {
        return Ok(());
    };

    tracing::info!("Handling /help command for user {}", who.user_id);

    let reply = state.quotes.help(&who).await;
    deliver(&bot, msg.chat.id, reply).await?;

    tracing::info!("Time taken to handle /help command: {:?}", start_time.elapsed());
    Ok(())
}
