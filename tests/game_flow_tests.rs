//! # Game Flow Integration Tests
//!
//! Multi-step guess-the-number rounds driven with a deterministic secret
//! source, the way real chats play them.

use std::sync::Arc;

use marketbot::game::{
    success_notice, FixedSecretSource, GuessGame, GAME_PROMPT, NOT_A_NUMBER_NOTICE,
    TOO_HIGH_NOTICE, TOO_LOW_NOTICE,
};

#[tokio::test]
async fn test_full_round_win_then_replay() {
    let game = GuessGame::new(Arc::new(FixedSecretSource::new(vec![50, 75])));
    let chat = 100;

    assert_eq!(game.start(chat).await, GAME_PROMPT);
    assert_eq!(game.guess(chat, "30").await.as_deref(), Some(TOO_LOW_NOTICE));
    assert_eq!(game.guess(chat, "80").await.as_deref(), Some(TOO_HIGH_NOTICE));
    assert_eq!(game.guess(chat, "50").await, Some(success_notice(50)));

    // The win closed the session; further numbers are plain chatter.
    assert_eq!(game.guess(chat, "50").await, None);

    // A new round draws the next secret.
    assert_eq!(game.start(chat).await, GAME_PROMPT);
    assert_eq!(game.guess(chat, "50").await.as_deref(), Some(TOO_LOW_NOTICE));
    assert_eq!(game.guess(chat, "75").await, Some(success_notice(75)));
}

#[tokio::test]
async fn test_chats_play_independent_rounds() {
    let game = GuessGame::new(Arc::new(FixedSecretSource::new(vec![10, 90])));
    let chat_a = 1;
    let chat_b = 2;

    game.start(chat_a).await;
    game.start(chat_b).await;

    // The same guess means different things in different chats.
    assert_eq!(
        game.guess(chat_a, "90").await.as_deref(),
        Some(TOO_HIGH_NOTICE)
    );
    assert_eq!(game.guess(chat_b, "90").await, Some(success_notice(90)));

    // Chat B's win does not touch chat A's round.
    assert_eq!(game.active_secret(chat_a).await, Some(10));
    assert_eq!(game.active_secret(chat_b).await, None);
    assert_eq!(game.guess(chat_a, "10").await, Some(success_notice(10)));
}

#[tokio::test]
async fn test_restart_overwrites_running_round() {
    let game = GuessGame::new(Arc::new(FixedSecretSource::new(vec![40, 60])));
    let chat = 7;

    game.start(chat).await;
    assert_eq!(game.active_secret(chat).await, Some(40));

    // Starting again mid-round silently replaces the secret.
    game.start(chat).await;
    assert_eq!(game.active_secret(chat).await, Some(60));
    assert_eq!(game.guess(chat, "40").await.as_deref(), Some(TOO_LOW_NOTICE));
    assert_eq!(game.guess(chat, "60").await, Some(success_notice(60)));
}

#[tokio::test]
async fn test_non_numeric_chatter_keeps_the_round_alive() {
    let game = GuessGame::new(Arc::new(FixedSecretSource::new(vec![25])));
    let chat = 5;

    game.start(chat).await;
    assert_eq!(
        game.guess(chat, "twenty five").await.as_deref(),
        Some(NOT_A_NUMBER_NOTICE)
    );
    assert_eq!(game.active_secret(chat).await, Some(25));
    assert_eq!(game.guess(chat, " 25 ").await, Some(success_notice(25)));
}
