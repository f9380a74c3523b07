//! Guess-the-number game engine.
//!
//! Each chat owns at most one session: a secret drawn uniformly from
//! 1..=100. Guesses are evaluated against the secret and answered with a
//! feedback notice; the session ends the moment a guess matches. Sessions
//! live in memory only and do not survive a restart.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;

use rand::Rng;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Lower bound of the secret range (inclusive).
pub const SECRET_MIN: i64 = 1;
/// Upper bound of the secret range (inclusive).
pub const SECRET_MAX: i64 = 100;

/// Prompt returned when a session starts.
pub const GAME_PROMPT: &str =
    "🎲 I picked a number between 1 and 100. Send me your guess!";
/// Notice for input that is neither an integer nor a command.
pub const NOT_A_NUMBER_NOTICE: &str =
    "🤔 That doesn't look like a number. Send a whole number, like 42.";
/// Notice for a guess below the secret.
pub const TOO_LOW_NOTICE: &str = "⬇️ Too low. Try a bigger number.";
/// Notice for a guess above the secret.
pub const TOO_HIGH_NOTICE: &str = "⬆️ Too high. Try a smaller number.";

// Input starting with this marker is a command for the router, never a
// guess, so the engine stays silent on it even when it fails to parse.
const COMMAND_MARKER: char = '/';

/// Notice for a winning guess, revealing the secret.
pub fn success_notice(secret: i64) -> String {
    format!("🎉 Correct! The number was {secret}. Send /game to play again.")
}

/// Source of secrets for new sessions. Implementations must return values
/// uniformly distributed over [`SECRET_MIN`]..=[`SECRET_MAX`].
pub trait SecretSource: Send + Sync {
    fn pick(&self) -> i64;
}

/// Production source backed by the thread-local RNG.
#[derive(Debug, Default)]
pub struct RngSecretSource;

impl SecretSource for RngSecretSource {
    fn pick(&self) -> i64 {
        rand::thread_rng().gen_range(SECRET_MIN..=SECRET_MAX)
    }
}

/// Deterministic source cycling through a fixed sequence. Used by tests
/// that need to know the secret in advance.
pub struct FixedSecretSource {
    values: Vec<i64>,
    cursor: AtomicUsize,
}

impl FixedSecretSource {
    /// Create a source that yields `values` in order, wrapping around.
    ///
    /// # Panics
    /// Panics if `values` is empty.
    pub fn new(values: Vec<i64>) -> Self {
        assert!(!values.is_empty(), "FixedSecretSource needs at least one value");
        Self {
            values,
            cursor: AtomicUsize::new(0),
        }
    }
}

impl SecretSource for FixedSecretSource {
    fn pick(&self) -> i64 {
        let index = self.cursor.fetch_add(1, AtomicOrdering::Relaxed);
        self.values[index % self.values.len()]
    }
}

/// Per-chat guess-the-number sessions.
///
/// The session map is owned here and guarded by a mutex so concurrently
/// dispatched updates cannot lose each other's writes. The lock is never
/// held across a transport call.
pub struct GuessGame {
    sessions: Mutex<HashMap<i64, i64>>,
    secrets: Arc<dyn SecretSource>,
}

impl GuessGame {
    pub fn new(secrets: Arc<dyn SecretSource>) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            secrets,
        }
    }

    /// Start a session for `chat_id` and return the prompt.
    ///
    /// Any in-progress session for the chat is overwritten and its secret
    /// discarded; a player cannot resume a prior game after starting a new
    /// one. Always succeeds.
    pub async fn start(&self, chat_id: i64) -> String {
        let secret = self.secrets.pick();
        let mut sessions = self.sessions.lock().await;
        let replaced = sessions.insert(chat_id, secret).is_some();
        info!(chat_id = chat_id, replaced = replaced, "guess session started");
        GAME_PROMPT.to_string()
    }

    /// Evaluate `raw` as a guess for `chat_id`.
    ///
    /// Returns `None` when the chat has no active session (the input is not
    /// a guess in this context and the caller routes it elsewhere), or when
    /// the input starts with the command marker and does not parse as an
    /// integer. Otherwise returns the feedback notice. A winning guess
    /// removes the session.
    pub async fn guess(&self, chat_id: i64, raw: &str) -> Option<String> {
        let mut sessions = self.sessions.lock().await;
        let secret = *sessions.get(&chat_id)?;

        let trimmed = raw.trim();
        let value: i64 = match trimmed.parse() {
            Ok(value) => value,
            Err(_) => {
                if trimmed.starts_with(COMMAND_MARKER) {
                    return None;
                }
                debug!(chat_id = chat_id, input = trimmed, "guess did not parse");
                return Some(NOT_A_NUMBER_NOTICE.to_string());
            }
        };

        // A guess is never range-checked: 0 or 9999 is simply very low or
        // very high.
        match value.cmp(&secret) {
            Ordering::Equal => {
                sessions.remove(&chat_id);
                info!(chat_id = chat_id, secret = secret, "guess session won");
                Some(success_notice(secret))
            }
            Ordering::Less => Some(TOO_LOW_NOTICE.to_string()),
            Ordering::Greater => Some(TOO_HIGH_NOTICE.to_string()),
        }
    }

    /// Current secret for `chat_id`, if a session is active.
    pub async fn active_secret(&self, chat_id: i64) -> Option<i64> {
        self.sessions.lock().await.get(&chat_id).copied()
    }
}
