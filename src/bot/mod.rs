//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules for better organization:
//! - `commands`: Parses `/command` messages and their arguments
//! - `message_handler`: Routes incoming messages to the game, news, store
//!   and broadcast components
//! - `callback_handler`: Handles the admin panel's inline keyboard
//! - `ui_builder`: Creates keyboards and formats messages

use sqlx::sqlite::SqlitePool;

use crate::broadcast::Broadcaster;
use crate::config::Config;
use crate::game::GuessGame;
use crate::news::HeadlineClient;

pub mod callback_handler;
pub mod commands;
pub mod message_handler;
pub mod ui_builder;

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use message_handler::message_handler;

/// Everything the handlers share, assembled once at startup and passed to
/// the dispatcher behind an `Arc`.
pub struct AppState {
    pub config: Config,
    pub game: GuessGame,
    pub broadcaster: Broadcaster,
    pub news: HeadlineClient,
    pub store: SqlitePool,
}
