use std::sync::Arc;
use std::time::Instant;

use teloxide::prelude::*;
use tracing::info;

use crate::commands::deliver;
use crate::services::quote_service::Caller;
use crate::state::{AppState, HandlerResult};

/// Handler for /start: resets the user's selection and shows the main menu
/// in the language Telegram reports for the user.
pub async fn handle_start(bot: Bot, msg: Message, state: Arc<AppState>) -> HandlerResult {
    let start_time = Instant::now();
    let Some(who) = msg.from.as_ref().map(Caller::from) else {
        return Ok(());
    };

    info!(
        "Processing /start command from user {} (language: {:?})",
        who.user_id, who.language_code
    );

    let reply = state.quotes.start(&who).await;
    deliver(&bot, msg.chat.id, reply).await?;

    info!("Time taken to handle /start command: {:?}", start_time.elapsed());
    Ok(())
}
