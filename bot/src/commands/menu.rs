use std::sync::Arc;

use teloxide::prelude::*;
use tracing::{debug, info};

use crate::commands::deliver;
use crate::keyboards::Selection;
use crate::services::quote_service::Caller;
use crate::state::{AppState, HandlerResult};

/// Free text sent from the main reply keyboard.
pub async fn handle_menu_text(bot: Bot, msg: Message, state: Arc<AppState>) -> HandlerResult {
    let (Some(who), Some(text)) = (msg.from.as_ref().map(Caller::from), msg.text()) else {
        debug!("Ignoring message without sender or text in chat {:?}", msg.chat.id);
        return Ok(());
    };

    info!("Handling menu text from user {}: {:?}", who.user_id, text);
    let reply = state.quotes.menu_choice(&who, text).await;
    deliver(&bot, msg.chat.id, reply).await
}

/// Inline keyboard presses (`crypto_<SYMBOL>` / `currency_<CODE>`).
pub async fn handle_selection_callback(
    bot: Bot,
    q: CallbackQuery,
    state: Arc<AppState>,
) -> HandlerResult {
    bot.answer_callback_query(q.id.clone()).await?;

    let who = Caller::from(&q.from);
    let Some(chat_id) = q.message.as_ref().map(|m| m.chat().id) else {
        debug!("Callback from user {} has no message attached", who.user_id);
        return Ok(());
    };

    info!("Handling selection callback from user {}: {:?}", who.user_id, q.data);
    let selection = q.data.as_deref().and_then(Selection::parse);
    let reply = state.quotes.select(&who, selection).await;
    deliver(&bot, chat_id, reply).await
}
