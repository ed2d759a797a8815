use std::sync::Arc;

use chrono::{TimeZone, Utc};
use teloxide::prelude::*;

use crate::state::{AppState, HandlerResult};

/// Handler for /version: build metadata embedded by build.rs.
pub async fn handle_version(bot: Bot, msg: Message, state: Arc<AppState>) -> HandlerResult {
    let user_id = msg.from.as_ref().map(|u| u.id.0 as i64).unwrap_or_default();
    tracing::info!("Handling /version command for user {}", user_id);

    let git_hash = option_env!("GIT_HASH").unwrap_or("unknown");
    let git_branch = option_env!("GIT_BRANCH").unwrap_or("unknown");
    let git_tag = option_env!("GIT_TAG").unwrap_or("unknown");
    let target_os = option_env!("CARGO_CFG_TARGET_OS").unwrap_or("unknown");
    let build_time = format_build_time(option_env!("BUILD_TIME").unwrap_or("unknown"));

    let text = format!(
        "{} v{}\n\nCommit: {}\nBranch: {}\nTag: {}\nBuilt: {}\nTarget OS: {}",
        state.bot_name,
        env!("CARGO_PKG_VERSION"),
        git_hash,
        git_branch,
        git_tag,
        build_time,
        target_os
    );
    bot.send_message(msg.chat.id, text).await?;
    Ok(())
}

/// Epoch seconds -> "YYYY-mm-dd HH:MM:SS UTC"; anything else is shown as is.
fn format_build_time(raw: &str) -> String {
    raw.parse::<i64>()
        .ok()
        .and_then(|epoch| Utc.timestamp_opt(epoch, 0).single())
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| raw.to_string())
}
