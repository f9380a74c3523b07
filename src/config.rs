//! Environment-driven configuration.
//!
//! Every value is read once at startup; a missing or malformed variable is
//! fatal before the dispatcher starts. `.env` loading happens in `main`.

use anyhow::{Context, Result};
use std::env;

/// Default base URL for the headline service (NewsAPI-shaped).
pub const DEFAULT_NEWS_API_BASE_URL: &str = "https://newsapi.org/v2";

/// Runtime configuration collected from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot token used by the transport.
    pub bot_token: String,
    /// Chat id of the single administrator. Broadcast and the admin panel
    /// compare against this value verbatim.
    pub admin_chat_id: i64,
    /// API key for the headline service.
    pub news_api_key: String,
    /// sqlx connection string for the store database, e.g.
    /// `sqlite://marketbot.db?mode=rwc`.
    pub database_url: String,
    /// Base URL of the headline service. Overridable for tests and mirrors.
    pub news_api_base_url: String,
}

impl Config {
    /// Read the full configuration from the environment.
    pub fn from_env() -> Result<Self> {
        let bot_token =
            env::var("TELEGRAM_BOT_TOKEN").context("TELEGRAM_BOT_TOKEN must be set")?;
        let admin_chat_id = parse_admin_chat_id(
            &env::var("ADMIN_CHAT_ID").context("ADMIN_CHAT_ID must be set")?,
        )?;
        let news_api_key = env::var("NEWS_API_KEY").context("NEWS_API_KEY must be set")?;
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let news_api_base_url = env::var("NEWS_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_NEWS_API_BASE_URL.to_string());

        Ok(Self {
            bot_token,
            admin_chat_id,
            news_api_key,
            database_url,
            news_api_base_url,
        })
    }
}

/// Parse the administrator chat id from its environment form.
///
/// Telegram chat ids are signed 64-bit integers (negative for groups).
pub fn parse_admin_chat_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .with_context(|| format!("ADMIN_CHAT_ID must be a numeric chat id, got '{raw}'"))
}
