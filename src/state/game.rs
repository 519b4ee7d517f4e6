//! Game session state and the guess engine.
//!
//! A conversation is always in one of three states as far as the engine is
//! concerned:
//!
//! ```text
//!                  any guess
//! ┌───────────┐ ───────────────▶ ┌──────────┐  guess (cooldown ok, valid word)
//! │ NoSession │                  │  Active  │◀──────────────────┐
//! └───────────┘                  └────┬─────┘───────────────────┘
//!                                     │ winning guess or 6th guess
//!                                     ▼
//!                                ┌──────────┐
//!                                │   Over   │── game cooldown elapsed ──▶ Active
//!                                └──────────┘       (new secret)
//! ```
//!
//! [`play`] is pure: it takes the stored session by reference and returns a
//! new one. Persisting it is the caller's job.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::cooldown::{is_pending, CooldownConfig};
use super::words::WordStore;

/// Maximum guesses per round.
pub const MAX_GUESSES: usize = 6;

/// A word submitted by a player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guess {
    pub word: String,
    pub user_id: i64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl Guess {
    pub fn new(word: impl Into<String>, user_id: i64, timestamp: DateTime<Utc>) -> Self {
        Self {
            word: word.into(),
            user_id,
            timestamp,
        }
    }
}

/// One conversation's current round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Word to guess
    #[serde(alias = "word")]
    secret_word: String,

    /// Guesses in submission order
    guesses: Vec<Guess>,
}

impl Session {
    /// Create a session with no guesses yet.
    pub fn new(secret_word: impl Into<String>) -> Self {
        Self {
            secret_word: secret_word.into(),
            guesses: Vec::new(),
        }
    }

    /// Create a session whose first guess is `guess`.
    pub fn start(secret_word: impl Into<String>, guess: Guess) -> Self {
        Self {
            secret_word: secret_word.into(),
            guesses: vec![guess],
        }
    }

    /// Return a copy of this session with `guess` appended.
    pub fn with_guess(&self, guess: Guess) -> Self {
        let mut guesses = Vec::with_capacity(self.guesses.len() + 1);
        guesses.extend(self.guesses.iter().cloned());
        guesses.push(guess);
        Self {
            secret_word: self.secret_word.clone(),
            guesses,
        }
    }

    pub fn secret_word(&self) -> &str {
        &self.secret_word
    }

    pub fn guesses(&self) -> &[Guess] {
        &self.guesses
    }

    pub fn guess_count(&self) -> usize {
        self.guesses.len()
    }

    /// Most recent guess of anyone.
    pub fn last_guess(&self) -> Option<&Guess> {
        self.guesses.last()
    }

    /// Most recent guess of one player.
    pub fn last_guess_by(&self, user_id: i64) -> Option<&Guess> {
        self.guesses.iter().rev().find(|g| g.user_id == user_id)
    }

    /// Check if the last guess hit the secret.
    pub fn is_won(&self) -> bool {
        self.last_guess()
            .is_some_and(|g| g.word == self.secret_word)
    }

    /// Check if the round is finished, won or lost.
    pub fn is_over(&self) -> bool {
        self.guesses.len() >= MAX_GUESSES || self.is_won()
    }

    /// Structural checks for a session read from outside the process.
    pub fn validate(&self) -> Result<(), String> {
        if self.secret_word.is_empty() {
            return Err("empty secret word".to_string());
        }
        if self.guesses.len() > MAX_GUESSES {
            return Err(format!(
                "{} guesses exceeds maximum of {}",
                self.guesses.len(),
                MAX_GUESSES
            ));
        }
        Ok(())
    }
}

/// A guess that was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A new round began with this guess
    Start { session: Session },
    /// The round is still going
    Continue { session: Session },
    /// The round finished
    End { session: Session, success: bool },
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start { .. } => "start",
            Self::Continue { .. } => "continue",
            Self::End { .. } => "end",
        }
    }

    pub fn session(&self) -> &Session {
        match self {
            Self::Start { session } | Self::Continue { session } | Self::End { session, .. } => {
                session
            }
        }
    }

    pub fn into_session(self) -> Session {
        match self {
            Self::Start { session } | Self::Continue { session } | Self::End { session, .. } => {
                session
            }
        }
    }
}

/// A guess that was refused. Stored state is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Not in the dictionary
    InvalidWord,
    /// The same player guessed too recently
    TurnCooldown { remaining: Duration },
    /// The last round ended too recently
    GameCooldown { remaining: Duration },
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidWord => "invalid word",
            Self::TurnCooldown { .. } => "turn cooldown",
            Self::GameCooldown { .. } => "game cooldown",
        }
    }

    /// Wait left for cooldown rejections.
    pub fn remaining(&self) -> Option<Duration> {
        match self {
            Self::InvalidWord => None,
            Self::TurnCooldown { remaining } | Self::GameCooldown { remaining } => Some(*remaining),
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.remaining() {
            Some(remaining) => write!(
                f,
                "{} ({} ms left)",
                self.as_str(),
                remaining.num_milliseconds()
            ),
            None => f.write_str(self.as_str()),
        }
    }
}

/// A conversation's state as seen by the engine.
#[derive(Debug, Clone, Copy)]
pub enum SessionState<'a> {
    NoSession,
    Active(&'a Session),
    Over(&'a Session),
}

impl<'a> SessionState<'a> {
    pub fn of(session: Option<&'a Session>) -> Self {
        match session {
            None => Self::NoSession,
            Some(s) if s.is_over() => Self::Over(s),
            Some(s) => Self::Active(s),
        }
    }
}

/// Everything besides the guess and session that a decision depends on.
#[derive(Debug, Clone, Copy)]
pub struct PlayContext<'a> {
    pub words: &'a WordStore,
    pub cooldowns: &'a CooldownConfig,
    /// One-on-one conversation: cooldowns don't apply
    pub is_private: bool,
}

/// Decide what a guess does to a conversation's session.
///
/// Cooldowns are checked before the word itself, so a player waiting out a
/// cooldown learns nothing about their word. "Now" is the guess's timestamp.
pub fn play<R: Rng + ?Sized>(
    guess: Guess,
    current: Option<&Session>,
    ctx: &PlayContext<'_>,
    rng: &mut R,
) -> Result<Outcome, Rejection> {
    let now = guess.timestamp;

    let (session, over) = match SessionState::of(current) {
        SessionState::NoSession => return Ok(start(guess, ctx.words, rng)),
        SessionState::Active(s) => (s, false),
        SessionState::Over(s) => (s, true),
    };

    let remaining = ctx
        .cooldowns
        .turn_remaining(session, guess.user_id, now, ctx.is_private);
    if is_pending(remaining) {
        return Err(Rejection::TurnCooldown { remaining });
    }

    if !ctx.words.is_valid_guess(&guess.word) {
        return Err(Rejection::InvalidWord);
    }

    if !over {
        return Ok(apply(session, guess));
    }

    let remaining = ctx.cooldowns.game_remaining(session, now, ctx.is_private);
    if is_pending(remaining) {
        return Err(Rejection::GameCooldown { remaining });
    }

    Ok(start(guess, ctx.words, rng))
}

fn start<R: Rng + ?Sized>(guess: Guess, words: &WordStore, rng: &mut R) -> Outcome {
    let secret = words.random_answer(rng);
    Outcome::Start {
        session: Session::start(secret, guess),
    }
}

fn apply(session: &Session, guess: Guess) -> Outcome {
    let hit = guess.word == session.secret_word;
    let session = session.with_guess(guess);

    if hit {
        Outcome::End {
            session,
            success: true,
        }
    } else if session.guess_count() >= MAX_GUESSES {
        Outcome::End {
            session,
            success: false,
        }
    } else {
        Outcome::Continue { session }
    }
}
