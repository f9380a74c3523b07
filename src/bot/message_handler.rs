//! Message handler module for routing incoming Telegram messages

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, info, warn};

use super::commands::{parse_command, parse_product_spec, Command};
use super::ui_builder::{
    bad_product_spec_notice, format_headlines, order_placed_notice, out_of_stock_notice,
    panel_keyboard, product_added_notice, product_not_found_notice, unsupported_category_notice,
    ADMIN_ONLY_NOTICE, BROADCAST_USAGE, CHAT_HINT, HELP_TEXT, NEWS_UNAVAILABLE_NOTICE,
    NON_TEXT_NOTICE, ORDER_USAGE, PANEL_TEXT, WELCOME_TEXT,
};
use super::AppState;
use crate::broadcast::BroadcastOutcome;
use crate::news::{is_supported_category, DEFAULT_CATEGORY};
use crate::store;

pub async fn message_handler(bot: Bot, msg: Message, state: Arc<AppState>) -> Result<()> {
    let chat_id = msg.chat.id.0;

    // Every chat that messages us becomes a broadcast recipient.
    if state.broadcaster.register(chat_id).await {
        info!(chat_id = chat_id, "registered new chat");
    }

    if let Some(text) = msg.text() {
        handle_text_message(&bot, &msg, text, &state).await?;
    } else {
        debug!(chat_id = chat_id, "received non-text message");
        bot.send_message(msg.chat.id, NON_TEXT_NOTICE).await?;
    }

    Ok(())
}

async fn handle_text_message(
    bot: &Bot,
    msg: &Message,
    text: &str,
    state: &AppState,
) -> Result<()> {
    let chat_id = msg.chat.id.0;
    debug!(
        chat_id = chat_id,
        message_length = text.len(),
        "received text message"
    );

    match parse_command(text) {
        Some(Command::Start) => {
            bot.send_message(msg.chat.id, WELCOME_TEXT).await?;
        }
        Some(Command::Help) => {
            bot.send_message(msg.chat.id, HELP_TEXT).await?;
        }
        Some(Command::Game) => {
            let prompt = state.game.start(chat_id).await;
            bot.send_message(msg.chat.id, prompt).await?;
        }
        Some(Command::News { category }) => {
            handle_news_command(bot, msg, category, state).await?;
        }
        Some(Command::Broadcast { text }) => {
            handle_broadcast_command(bot, msg, &text, state).await?;
        }
        Some(Command::Admin) => {
            handle_admin_command(bot, msg, state).await?;
        }
        Some(Command::AddProduct { spec }) => {
            handle_add_product_command(bot, msg, &spec, state).await?;
        }
        Some(Command::Order { name }) => {
            handle_order_command(bot, msg, &name, state).await?;
        }
        Some(Command::Unknown) => {
            debug!(chat_id = chat_id, "ignoring unknown command");
        }
        None => {
            // Plain chat text. With a session running this is a guess;
            // otherwise nudge toward the commands.
            match state.game.guess(chat_id, text).await {
                Some(reply) => {
                    bot.send_message(msg.chat.id, reply).await?;
                }
                None => {
                    bot.send_message(msg.chat.id, CHAT_HINT).await?;
                }
            }
        }
    }

    Ok(())
}

async fn handle_news_command(
    bot: &Bot,
    msg: &Message,
    category: Option<String>,
    state: &AppState,
) -> Result<()> {
    let category = category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
    if !is_supported_category(&category) {
        bot.send_message(msg.chat.id, unsupported_category_notice(&category))
            .await?;
        return Ok(());
    }

    match state.news.fetch_top_headlines(&category).await {
        Ok(headlines) => {
            bot.send_message(msg.chat.id, format_headlines(&headlines, &category))
                .await?;
        }
        Err(e) => {
            warn!(
                chat_id = msg.chat.id.0,
                category = %category,
                error = %e,
                "headline fetch failed"
            );
            bot.send_message(msg.chat.id, NEWS_UNAVAILABLE_NOTICE).await?;
        }
    }

    Ok(())
}

async fn handle_broadcast_command(
    bot: &Bot,
    msg: &Message,
    payload: &str,
    state: &AppState,
) -> Result<()> {
    let chat_id = msg.chat.id.0;

    // Missing payload from the admin is a usage mistake, not a broadcast.
    // Non-admins get the denial either way.
    if payload.is_empty() && chat_id == state.config.admin_chat_id {
        bot.send_message(msg.chat.id, BROADCAST_USAGE).await?;
        return Ok(());
    }

    match state.broadcaster.broadcast(chat_id, payload).await {
        BroadcastOutcome::Denied => {
            debug!(chat_id = chat_id, "broadcast request denied");
        }
        BroadcastOutcome::Sent { recipients } => {
            debug!(
                chat_id = chat_id,
                recipients = recipients,
                "broadcast handled"
            );
        }
    }

    Ok(())
}

async fn handle_admin_command(bot: &Bot, msg: &Message, state: &AppState) -> Result<()> {
    let chat_id = msg.chat.id.0;
    if chat_id != state.config.admin_chat_id {
        warn!(chat_id = chat_id, "admin panel refused");
        bot.send_message(msg.chat.id, ADMIN_ONLY_NOTICE).await?;
        return Ok(());
    }

    bot.send_message(msg.chat.id, PANEL_TEXT)
        .reply_markup(panel_keyboard())
        .await?;
    Ok(())
}

async fn handle_add_product_command(
    bot: &Bot,
    msg: &Message,
    spec: &str,
    state: &AppState,
) -> Result<()> {
    let chat_id = msg.chat.id.0;
    if chat_id != state.config.admin_chat_id {
        warn!(chat_id = chat_id, "add product refused");
        bot.send_message(msg.chat.id, ADMIN_ONLY_NOTICE).await?;
        return Ok(());
    }

    let product = match parse_product_spec(spec) {
        Ok(product) => product,
        Err(e) => {
            debug!(chat_id = chat_id, error = %e, "rejected product spec");
            bot.send_message(msg.chat.id, bad_product_spec_notice(&e.to_string()))
                .await?;
            return Ok(());
        }
    };

    store::add_product(
        &state.store,
        &product.name,
        product.price_cents,
        product.stock,
    )
    .await?;
    bot.send_message(
        msg.chat.id,
        product_added_notice(&product.name, product.price_cents, product.stock),
    )
    .await?;
    Ok(())
}

async fn handle_order_command(
    bot: &Bot,
    msg: &Message,
    name: &str,
    state: &AppState,
) -> Result<()> {
    let chat_id = msg.chat.id.0;
    if name.is_empty() {
        bot.send_message(msg.chat.id, ORDER_USAGE).await?;
        return Ok(());
    }

    let product = match store::find_product_by_name(&state.store, name).await? {
        Some(product) => product,
        None => {
            bot.send_message(msg.chat.id, product_not_found_notice(name))
                .await?;
            return Ok(());
        }
    };

    match store::create_order(&state.store, chat_id, product.id).await? {
        Some(order) => {
            bot.send_message(
                msg.chat.id,
                order_placed_notice(order.number, &product.name),
            )
            .await?;
        }
        None => {
            bot.send_message(msg.chat.id, out_of_stock_notice(&product.name))
                .await?;
        }
    }

    Ok(())
}
