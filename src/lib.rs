//! # Market Telegram Bot
//!
//! A Telegram bot that plays guess-the-number, relays news headlines,
//! takes product orders, and lets its administrator broadcast messages to
//! every chat it has seen.

pub mod bot;
pub mod broadcast;
pub mod config;
pub mod game;
pub mod news;
pub mod outbound;
pub mod store;
