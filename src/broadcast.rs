//! Recipient registry and admin broadcast fan-out.
//!
//! Every chat that ever sends the bot an update is remembered in an
//! in-memory set (never persisted, never pruned). An authorized broadcast
//! fans a message out to all of them except the administrator, best-effort:
//! individual delivery failures are logged and swallowed, they never abort
//! the rest of the fan-out and are never reported back to the requester.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::outbound::Outbound;

/// Notice sent to a requester who is not the administrator.
pub const BROADCAST_DENIED_NOTICE: &str =
    "🚫 Sorry, only the administrator can broadcast messages.";

/// Acknowledgment sent to the administrator before the fan-out starts.
/// `known` is the registry size at the moment of the call, administrator
/// included.
pub fn ack_notice(known: usize) -> String {
    format!("📣 Broadcasting your message to {known} known chats.")
}

/// What a broadcast request amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastOutcome {
    /// Requester is not the administrator; only a denial notice was sent.
    Denied,
    /// Fan-out ran with this many delivery attempts (failures included).
    Sent { recipients: usize },
}

/// Owns the recipient set and performs authorized fan-outs through the
/// injected [`Outbound`] capability.
pub struct Broadcaster {
    known: Mutex<HashSet<i64>>,
    admin_chat_id: i64,
    outbound: Arc<dyn Outbound>,
}

impl Broadcaster {
    pub fn new(admin_chat_id: i64, outbound: Arc<dyn Outbound>) -> Self {
        Self {
            known: Mutex::new(HashSet::new()),
            admin_chat_id,
            outbound,
        }
    }

    /// Remember a chat. Idempotent; called for every inbound update
    /// regardless of its content or sender. Returns whether the chat was
    /// new.
    pub async fn register(&self, chat_id: i64) -> bool {
        let newly = self.known.lock().await.insert(chat_id);
        if newly {
            debug!(chat_id = chat_id, "chat registered for broadcasts");
        }
        newly
    }

    /// Number of chats seen so far.
    pub async fn known_count(&self) -> usize {
        self.known.lock().await.len()
    }

    /// Authorize and fan out `payload` to every known chat except the
    /// administrator's own.
    ///
    /// A non-admin requester gets exactly one denial notice and nothing is
    /// delivered. The administrator gets one acknowledgment citing the
    /// registry size, then deliveries are issued concurrently; per-recipient
    /// failures are logged and dropped.
    pub async fn broadcast(&self, requester_id: i64, payload: &str) -> BroadcastOutcome {
        if requester_id != self.admin_chat_id {
            warn!(
                requester_id = requester_id,
                "broadcast denied for non-admin requester"
            );
            if let Err(e) = self.outbound.send(requester_id, BROADCAST_DENIED_NOTICE).await {
                warn!(chat_id = requester_id, error = %e, "failed to deliver denial notice");
            }
            return BroadcastOutcome::Denied;
        }

        // Snapshot the registry once: the ack cites its full size while the
        // fan-out excludes the administrator's own chat.
        let (known_count, recipients) = {
            let known = self.known.lock().await;
            let recipients: Vec<i64> = known
                .iter()
                .copied()
                .filter(|id| *id != self.admin_chat_id)
                .collect();
            (known.len(), recipients)
        };

        if let Err(e) = self.outbound.send(requester_id, &ack_notice(known_count)).await {
            warn!(chat_id = requester_id, error = %e, "failed to deliver broadcast ack");
        }

        let mut deliveries = JoinSet::new();
        for chat_id in recipients.iter().copied() {
            let outbound = Arc::clone(&self.outbound);
            let text = payload.to_string();
            deliveries.spawn(async move { (chat_id, outbound.send(chat_id, &text).await) });
        }

        let mut delivered = 0usize;
        while let Some(joined) = deliveries.join_next().await {
            match joined {
                Ok((_, Ok(()))) => delivered += 1,
                Ok((chat_id, Err(e))) => {
                    warn!(chat_id = chat_id, error = %e, "broadcast delivery failed");
                }
                Err(e) => warn!(error = %e, "broadcast delivery task failed"),
            }
        }

        info!(
            delivered = delivered,
            attempted = recipients.len(),
            "broadcast fan-out finished"
        );
        BroadcastOutcome::Sent {
            recipients: recipients.len(),
        }
    }
}
