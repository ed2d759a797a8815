use std::sync::Arc;

use anyhow::Result;
use teloxide::{dispatching::UpdateHandler, prelude::*};
use tracing_subscriber::EnvFilter;

// Catalogue lives in bot/locales; English is the fallback.
rust_i18n::i18n!("locales", fallback = "en");

mod commands;
mod i18n;
mod keyboards;
mod services;
mod state;

use crate::commands::{
    handle_help, handle_history, handle_menu_text, handle_price, handle_selection_callback,
    handle_start, handle_version, Command,
};
use crate::state::AppState;

fn schema() -> UpdateHandler<anyhow::Error> {
    use dptree::case;

    let command_handler = teloxide::filter_command::<Command, _>()
        .branch(case![Command::Start].endpoint(handle_start))
        .branch(case![Command::Price].endpoint(handle_price))
        .branch(case![Command::History].endpoint(handle_history))
        .branch(case![Command::Help].endpoint(handle_help))
        .branch(case![Command::Version].endpoint(handle_version));

    let message_handler = Update::filter_message()
        .branch(command_handler)
        .branch(dptree::endpoint(handle_menu_text));

    let callback_query_handler =
        Update::filter_callback_query().endpoint(handle_selection_callback);

    dptree::entry()
        .branch(message_handler)
        .branch(callback_query_handler)
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting CryptoPrice bot...");

    let app_state = Arc::new(AppState::new().await?);
    tracing::info!("AppState initialized");

    let bot = Bot::new(&app_state.bot_token);
    tracing::info!("Bot created");

    let mut dispatcher = Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![app_state.clone()])
        .enable_ctrlc_handler()
        .build();

    tracing::info!("Bot is running and waiting for updates...");
    dispatcher.dispatch().await;

    Ok(())
}
