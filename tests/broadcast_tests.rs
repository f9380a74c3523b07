//! # Broadcast Integration Tests
//!
//! End-to-end coverage of chat registration and admin fan-out, driven
//! through a recording transport instead of Telegram.

mod common;

use std::sync::Arc;

use common::RecordingOutbound;
use marketbot::broadcast::{ack_notice, BroadcastOutcome, Broadcaster, BROADCAST_DENIED_NOTICE};

const ADMIN: i64 = 1;

#[tokio::test]
async fn test_broadcast_reaches_every_chat_but_the_admin() {
    let outbound = Arc::new(RecordingOutbound::new());
    let broadcaster = Broadcaster::new(ADMIN, outbound.clone());

    broadcaster.register(ADMIN).await;
    broadcaster.register(22).await;
    broadcaster.register(33).await;

    let outcome = broadcaster.broadcast(ADMIN, "Fresh stock tomorrow!").await;
    assert_eq!(outcome, BroadcastOutcome::Sent { recipients: 2 });

    let sent = outbound.sent().await;
    assert_eq!(sent.len(), 3);

    // The acknowledgment goes out before any delivery and cites the full
    // registry size, admin included.
    assert_eq!(sent[0], (ADMIN, ack_notice(3)));

    // Delivery order is not fixed; membership is.
    assert!(sent[1..].contains(&(22, "Fresh stock tomorrow!".to_string())));
    assert!(sent[1..].contains(&(33, "Fresh stock tomorrow!".to_string())));
}

#[tokio::test]
async fn test_non_admin_request_earns_denial_only() {
    let outbound = Arc::new(RecordingOutbound::new());
    let broadcaster = Broadcaster::new(ADMIN, outbound.clone());

    broadcaster.register(ADMIN).await;
    broadcaster.register(22).await;
    broadcaster.register(33).await;

    let outcome = broadcaster.broadcast(22, "am I allowed?").await;
    assert_eq!(outcome, BroadcastOutcome::Denied);

    let sent = outbound.sent().await;
    assert_eq!(sent, vec![(22, BROADCAST_DENIED_NOTICE.to_string())]);
}

#[tokio::test]
async fn test_repeat_registrations_do_not_duplicate_deliveries() {
    let outbound = Arc::new(RecordingOutbound::new());
    let broadcaster = Broadcaster::new(ADMIN, outbound.clone());

    assert!(broadcaster.register(22).await);
    assert!(!broadcaster.register(22).await);
    assert!(!broadcaster.register(22).await);
    broadcaster.register(ADMIN).await;

    let outcome = broadcaster.broadcast(ADMIN, "hello").await;
    assert_eq!(outcome, BroadcastOutcome::Sent { recipients: 1 });

    let sent = outbound.sent().await;
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], (ADMIN, ack_notice(2)));
    assert_eq!(sent[1], (22, "hello".to_string()));
}

#[tokio::test]
async fn test_broadcast_with_admin_as_only_known_chat() {
    let outbound = Arc::new(RecordingOutbound::new());
    let broadcaster = Broadcaster::new(ADMIN, outbound.clone());

    broadcaster.register(ADMIN).await;

    let outcome = broadcaster.broadcast(ADMIN, "anyone there?").await;
    assert_eq!(outcome, BroadcastOutcome::Sent { recipients: 0 });

    // Just the acknowledgment; the admin never receives their own broadcast.
    assert_eq!(outbound.sent().await, vec![(ADMIN, ack_notice(1))]);
}

#[tokio::test]
async fn test_failed_delivery_leaves_the_rest_of_the_fanout_alone() {
    let outbound = Arc::new(RecordingOutbound::failing_for([22]));
    let broadcaster = Broadcaster::new(ADMIN, outbound.clone());

    broadcaster.register(ADMIN).await;
    broadcaster.register(22).await;
    broadcaster.register(33).await;
    broadcaster.register(44).await;

    let outcome = broadcaster.broadcast(ADMIN, "promo").await;
    assert_eq!(outcome, BroadcastOutcome::Sent { recipients: 3 });

    // All three recipients were attempted even though chat 22 rejected.
    let sent = outbound.sent().await;
    assert_eq!(sent.len(), 4);
    assert!(sent[1..].contains(&(22, "promo".to_string())));
    assert!(sent[1..].contains(&(33, "promo".to_string())));
    assert!(sent[1..].contains(&(44, "promo".to_string())));
}
