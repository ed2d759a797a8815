use std::sync::Arc;
use std::time::Instant;

use teloxide::prelude::*;
use tracing::info;

use crate::commands::deliver;
use crate::services::quote_service::Caller;
use crate::state::{AppState, HandlerResult};

/// Handler for /price
pub async fn handle_price(bot: Bot, msg: Message, state: Arc<AppState>) -> HandlerResult {
    let start_time = Instant::now();
    let Some(who) = msg.from.as_ref().map(Caller::from) else {
        return Ok(());
    };

    info!("Handling /price command for user {}", who.user_id);
    let reply = state.quotes.price(&who).await;
    deliver(&bot, msg.chat.id, reply).await?;

    info!("Time taken to handle /price command: {:?}", start_time.elapsed());
    Ok(())
}

/// Handler for /history
pub async fn handle_history(bot: Bot, msg: Message, state: Arc<AppState>) -> HandlerResult {
    let Some(who) = msg.from.as_ref().map(Caller::from) else {
        return Ok(());
    };

    info!("Handling /history command for user {}", who.user_id);
    let reply = state.quotes.history(&who).await;
    deliver(&bot, msg.chat.id, reply).await
}
