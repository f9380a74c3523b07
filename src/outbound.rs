//! Outbound transport capability.
//!
//! The broadcaster only ever needs "send this text to that chat", so it
//! depends on this narrow trait instead of a concrete client. Tests inject
//! a recording stub; production wires [`TelegramOutbound`].

use anyhow::{Context, Result};
use async_trait::async_trait;
use teloxide::prelude::*;

/// Capability to deliver a text message to a chat.
#[async_trait]
pub trait Outbound: Send + Sync {
    async fn send(&self, chat_id: i64, text: &str) -> Result<()>;
}

/// Teloxide-backed implementation of [`Outbound`].
pub struct TelegramOutbound {
    bot: Bot,
}

impl TelegramOutbound {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Outbound for TelegramOutbound {
    async fn send(&self, chat_id: i64, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat_id), text)
            .await
            .with_context(|| format!("failed to send message to chat {chat_id}"))?;
        Ok(())
    }
}
