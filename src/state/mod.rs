//! Game state for the chat Wordle bot.
//!
//! - `words` - answer and guess dictionaries
//! - `evaluate` - letter-by-letter scoring of a guess
//! - `cooldown` - turn and game cooldown policy
//! - `game` - sessions and the guess engine
//! - `store` - per-conversation session persistence
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                           GameService                             │
//! │                                                                   │
//! │   GuessEvent ──▶ store.get ──▶ game::play ──▶ store.set (on Ok)   │
//! │                                    │                              │
//! │                      ┌─────────────┼──────────────┐               │
//! │                      ▼             ▼              ▼               │
//! │                 ┌─────────┐ ┌────────────┐ ┌──────────────┐       │
//! │                 │WordStore│ │CooldownConf│ │ SessionStore │       │
//! │                 └─────────┘ └────────────┘ │ conversation │       │
//! │                                            │  → Session   │       │
//! │                                            └──────────────┘       │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust
//! use chrono::Utc;
//! use wordle_state::state::{
//!     CooldownConfig, GameService, GuessEvent, MemoryStore, Outcome, SessionStore, WordStore,
//! };
//!
//! let words = WordStore::embedded().unwrap();
//! let service = GameService::new(words, CooldownConfig::disabled(), MemoryStore::new("games"));
//!
//! let event = GuessEvent::new("crane", 1, Utc::now(), -1001, false);
//! let outcome = service.handle(&event).unwrap();
//! assert!(matches!(outcome, Outcome::Start { .. }));
//! assert_eq!(service.store().get(-1001).unwrap().guess_count(), 1);
//! ```

pub mod cooldown;
pub mod evaluate;
pub mod game;
pub mod store;
pub mod words;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Result;

// Re-export commonly used types
pub use cooldown::CooldownConfig;
pub use evaluate::{evaluate, LetterStatus};
pub use game::{play, Guess, Outcome, PlayContext, Rejection, Session, SessionState, MAX_GUESSES};
pub use store::{FileStore, MemoryStore, SessionStore};
pub use words::{WordStore, WORD_LENGTH};

/// Name of the session cache file.
pub const GAME_CACHE_NAME: &str = "wordle-game-cache";

/// A guess as delivered by the chat transport.
///
/// The word is matched case-insensitively: [`guess`](Self::guess) always
/// yields it lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessEvent {
    pub word: String,
    pub user_id: i64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub conversation_id: i64,
    #[serde(rename = "isPrivateConversation")]
    pub is_private: bool,
}

impl GuessEvent {
    pub fn new(
        word: impl Into<String>,
        user_id: i64,
        timestamp: DateTime<Utc>,
        conversation_id: i64,
        is_private: bool,
    ) -> Self {
        Self {
            word: word.into().to_lowercase(),
            user_id,
            timestamp,
            conversation_id,
            is_private,
        }
    }

    pub fn guess(&self) -> Guess {
        Guess::new(self.word.to_lowercase(), self.user_id, self.timestamp)
    }
}

/// Runs guesses against stored sessions.
///
/// Each call to [`handle`](Self::handle) is one read-decide-write cycle.
/// Callers must not run two cycles for the same conversation at once.
#[derive(Debug)]
pub struct GameService<S> {
    words: WordStore,
    cooldowns: CooldownConfig,
    store: S,
}

impl<S: SessionStore> GameService<S> {
    pub fn new(words: WordStore, cooldowns: CooldownConfig, store: S) -> Self {
        Self {
            words,
            cooldowns,
            store,
        }
    }

    pub fn words(&self) -> &WordStore {
        &self.words
    }

    pub fn cooldowns(&self) -> &CooldownConfig {
        &self.cooldowns
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Apply one guess event, storing the new session if it was accepted.
    pub fn handle(&self, event: &GuessEvent) -> std::result::Result<Outcome, Rejection> {
        self.handle_with_rng(event, &mut rand::thread_rng())
    }

    /// [`handle`](Self::handle) with a caller-supplied source of secrets.
    pub fn handle_with_rng<R: Rng + ?Sized>(
        &self,
        event: &GuessEvent,
        rng: &mut R,
    ) -> std::result::Result<Outcome, Rejection> {
        tracing::debug!(
            conversation_id = event.conversation_id,
            user_id = event.user_id,
            word = %event.word,
            "Guess received"
        );

        let current = self.store.get(event.conversation_id);
        let ctx = PlayContext {
            words: &self.words,
            cooldowns: &self.cooldowns,
            is_private: event.is_private,
        };

        let result = play(event.guess(), current.as_ref(), &ctx, rng);
        match &result {
            Ok(outcome) => {
                self.store
                    .set(event.conversation_id, outcome.session().clone());
                tracing::info!(
                    conversation_id = event.conversation_id,
                    outcome = outcome.as_str(),
                    guesses = outcome.session().guess_count(),
                    "Guess applied"
                );
            }
            Err(rejection) => {
                tracing::debug!(
                    conversation_id = event.conversation_id,
                    user_id = event.user_id,
                    %rejection,
                    "Guess rejected"
                );
            }
        }
        result
    }
}

impl GameService<FileStore> {
    /// Build the service from process configuration: embedded word lists and
    /// a file-backed store under `cache_dir` when one is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let words = WordStore::embedded()?;
        let store = FileStore::open(GAME_CACHE_NAME, config.cache_dir.as_deref());

        tracing::debug!(
            options = %serde_json::to_string(&config.game).unwrap_or_default(),
            "Game options"
        );

        Ok(Self::new(words, config.game.cooldowns, store))
    }
}
