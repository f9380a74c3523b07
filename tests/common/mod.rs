//! Shared test doubles for the integration tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::Mutex;

use marketbot::outbound::Outbound;

/// Transport that records every send instead of talking to Telegram.
/// Sends to chats listed in `fail_for` are recorded and then reported as
/// failed, like a chat that has blocked the bot.
#[derive(Default)]
pub struct RecordingOutbound {
    sends: Mutex<Vec<(i64, String)>>,
    fail_for: HashSet<i64>,
}

impl RecordingOutbound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(chat_ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            sends: Mutex::new(Vec::new()),
            fail_for: chat_ids.into_iter().collect(),
        }
    }

    /// Everything sent so far, in send order.
    pub async fn sent(&self) -> Vec<(i64, String)> {
        self.sends.lock().await.clone()
    }
}

#[async_trait]
impl Outbound for RecordingOutbound {
    async fn send(&self, chat_id: i64, text: &str) -> Result<()> {
        self.sends.lock().await.push((chat_id, text.to_string()));
        if self.fail_for.contains(&chat_id) {
            return Err(anyhow!("send rejected for chat {chat_id}"));
        }
        Ok(())
    }
}
