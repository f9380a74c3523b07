use anyhow::{Context, Result};
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::CallbackQuery;
use tracing::info;
use tracing_subscriber::EnvFilter;

use marketbot::bot::{callback_handler, message_handler, AppState};
use marketbot::broadcast::Broadcaster;
use marketbot::config::Config;
use marketbot::game::{GuessGame, RngSecretSource};
use marketbot::news::HeadlineClient;
use marketbot::outbound::TelegramOutbound;
use marketbot::store;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting market bot");

    let config = Config::from_env()?;

    info!(database_url = %config.database_url, "Initializing store");
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to the database")?;
    store::init_store_schema(&pool).await?;

    let bot = Bot::new(config.bot_token.clone());

    let outbound = Arc::new(TelegramOutbound::new(bot.clone()));
    let state = Arc::new(AppState {
        game: GuessGame::new(Arc::new(RngSecretSource)),
        broadcaster: Broadcaster::new(config.admin_chat_id, outbound),
        news: HeadlineClient::new(
            config.news_api_key.clone(),
            config.news_api_base_url.clone(),
        ),
        store: pool,
        config,
    });

    info!("Bot initialized, starting dispatcher");

    // Set up the dispatcher with shared state
    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint({
            let state = Arc::clone(&state);
            move |bot: Bot, msg: Message| {
                let state = Arc::clone(&state);
                async move { message_handler(bot, msg, state).await }
            }
        }))
        .branch(Update::filter_callback_query().endpoint({
            let state = Arc::clone(&state);
            move |bot: Bot, q: CallbackQuery| {
                let state = Arc::clone(&state);
                async move { callback_handler(bot, q, state).await }
            }
        }));

    Dispatcher::builder(bot, handler)
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
