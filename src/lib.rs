//! Wordle State Library
//!
//! Game session engine and persistence for a Wordle game played in chat
//! conversations.
//!
//! # Overview
//!
//! - **Game Engine** - Decides whether a guess starts a round, continues it,
//!   ends it, or is rejected (invalid word, turn cooldown, game cooldown).
//!
//! - **Session Store** - One session per conversation, in memory with an
//!   optional JSON file that survives restarts.
//!
//! - **Commands and Replies** - Parse `/wordle` messages and produce the text
//!   a chat should show for each result.
//!
//! # Design Principles
//!
//! 1. **The engine is pure** - No I/O and no mutation. It returns a new session
//!    and the caller stores it.
//!
//! 2. **Rejections are values** - Bad guesses are reported through
//!    [`state::Rejection`], never as errors.
//!
//! 3. **Disk trouble is never fatal** - A broken cache file means an empty
//!    cache; a failed write is logged.
//!
//! 4. **No networking** - Receiving messages and sending replies belong to the
//!    chat transport.
//!
//! # Example
//!
//! ```rust
//! use chrono::Utc;
//! use wordle_state::{
//!     command::parse_command,
//!     config::Config,
//!     reply::{outcome_replies, rejection_reply},
//!     state::{GameService, GuessEvent},
//! };
//!
//! let config = Config::default();
//! let service = GameService::from_config(&config).unwrap();
//!
//! if let Some(word) = parse_command("/wordle Crane", false, config.game.shorthand) {
//!     let event = GuessEvent::new(word, 7, Utc::now(), -1001, false);
//!     let replies = match service.handle(&event) {
//!         Ok(outcome) => outcome_replies(&outcome),
//!         Err(rejection) => vec![rejection_reply(&rejection)],
//!     };
//!     assert!(!replies.is_empty());
//! }
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod logging;
pub mod reply;
pub mod state;

pub use error::{Error, Result};
// Re-export everything from state module at crate root
pub use state::*;
