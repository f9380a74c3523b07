//! Callback handler module for the admin panel inline keyboard

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardMarkup, MaybeInaccessibleMessage};
use tracing::{debug, error, info, warn};

use super::ui_builder::{
    format_order_list, format_product_list, orders_keyboard, panel_keyboard, products_keyboard,
    PANEL_CLOSED_TEXT, PANEL_TEXT, RESTOCK_STEP,
};
use super::AppState;
use crate::store;

/// Handle callback queries from the admin panel keyboard.
pub async fn callback_handler(
    bot: Bot,
    q: teloxide::types::CallbackQuery,
    state: Arc<AppState>,
) -> Result<()> {
    debug!(user_id = %q.from.id, "received callback query");

    if let Some(msg) = &q.message {
        let chat_id = msg.chat().id.0;

        if state.broadcaster.register(chat_id).await {
            info!(chat_id = chat_id, "registered new chat");
        }

        // The panel only ever goes to the admin chat; anything else just
        // gets its spinner cleared.
        if chat_id != state.config.admin_chat_id {
            warn!(chat_id = chat_id, "dropping callback from non-admin chat");
            bot.answer_callback_query(q.id).await?;
            return Ok(());
        }

        let data = q.data.as_deref().unwrap_or("");
        if data == "panel_main" {
            edit_panel(&bot, msg, PANEL_TEXT.to_string(), panel_keyboard()).await;
        } else if data == "panel_products" {
            render_products_view(&bot, msg, &state).await?;
        } else if data == "panel_orders" {
            render_orders_view(&bot, msg, &state).await?;
        } else if data == "panel_close" {
            match bot
                .edit_message_text(msg.chat().id, msg.id(), PANEL_CLOSED_TEXT)
                .await
            {
                Ok(_) => (),
                Err(e) => error!(chat_id = chat_id, error = %e, "failed to close panel"),
            }
        } else if let Some(rest) = data.strip_prefix("restock_") {
            let product_id = rest.parse::<i64>().unwrap_or(0);
            if store::increment_stock(&state.store, product_id, RESTOCK_STEP).await? {
                info!(product_id = product_id, "restocked product");
            }
            render_products_view(&bot, msg, &state).await?;
        } else if let Some(rest) = data.strip_prefix("done_") {
            let order_id = rest.parse::<i64>().unwrap_or(0);
            if store::update_order_status(&state.store, order_id, store::ORDER_STATUS_DONE).await? {
                info!(order_id = order_id, "order marked done");
            }
            render_orders_view(&bot, msg, &state).await?;
        } else {
            debug!(chat_id = chat_id, data = data, "ignoring unknown callback data");
        }
    }

    // Answer the callback query to remove the loading state
    bot.answer_callback_query(q.id).await?;

    Ok(())
}

async fn render_products_view(
    bot: &Bot,
    msg: &MaybeInaccessibleMessage,
    state: &AppState,
) -> Result<()> {
    let products = store::list_products(&state.store).await?;
    edit_panel(
        bot,
        msg,
        format_product_list(&products),
        products_keyboard(&products),
    )
    .await;
    Ok(())
}

async fn render_orders_view(
    bot: &Bot,
    msg: &MaybeInaccessibleMessage,
    state: &AppState,
) -> Result<()> {
    let orders = store::list_open_orders(&state.store).await?;
    edit_panel(
        bot,
        msg,
        format_order_list(&orders),
        orders_keyboard(&orders),
    )
    .await;
    Ok(())
}

// Edit the panel message in place. Telegram rejects edits that change
// nothing; those failures are logged and dropped.
async fn edit_panel(
    bot: &Bot,
    msg: &MaybeInaccessibleMessage,
    text: String,
    keyboard: InlineKeyboardMarkup,
) {
    match bot
        .edit_message_text(msg.chat().id, msg.id(), text)
        .reply_markup(keyboard)
        .await
    {
        Ok(_) => (),
        Err(e) => {
            error!(chat_id = %msg.chat().id, error = %e, "failed to edit panel message")
        }
    }
}
