//! Cooldown policy.
//!
//! Two independent waits, both skipped in private (one-on-one) conversations:
//!
//! - **turn cooldown** - time a player must wait between their own guesses
//! - **game cooldown** - time a conversation must wait after a round ends
//!   before a new one can start

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::game::Session;

/// Configured cooldown lengths, in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooldownConfig {
    #[serde(rename = "turnCooldownMilliseconds")]
    pub turn_cooldown_ms: u64,
    #[serde(rename = "gameCooldownMilliseconds")]
    pub game_cooldown_ms: u64,
}

impl CooldownConfig {
    pub fn new(turn_cooldown_ms: u64, game_cooldown_ms: u64) -> Self {
        Self {
            turn_cooldown_ms,
            game_cooldown_ms,
        }
    }

    /// No cooldowns at all.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn turn_cooldown(&self) -> Duration {
        millis(self.turn_cooldown_ms)
    }

    pub fn game_cooldown(&self) -> Duration {
        millis(self.game_cooldown_ms)
    }

    /// Time `user_id` still has to wait before guessing again.
    ///
    /// Zero or negative means the player may guess.
    pub fn turn_remaining(
        &self,
        session: &Session,
        user_id: i64,
        now: DateTime<Utc>,
        is_private: bool,
    ) -> Duration {
        if is_private {
            return Duration::zero();
        }
        session
            .last_guess_by(user_id)
            .map(|g| remaining(self.turn_cooldown(), g.timestamp, now))
            .unwrap_or_else(Duration::zero)
    }

    /// Time the conversation still has to wait before a finished round can
    /// be replaced.
    ///
    /// A session without any guesses waits the full cooldown.
    pub fn game_remaining(
        &self,
        session: &Session,
        now: DateTime<Utc>,
        is_private: bool,
    ) -> Duration {
        if is_private {
            return Duration::zero();
        }
        session
            .last_guess()
            .map(|g| remaining(self.game_cooldown(), g.timestamp, now))
            .unwrap_or_else(|| self.game_cooldown())
    }
}

fn millis(ms: u64) -> Duration {
    i64::try_from(ms)
        .ok()
        .and_then(Duration::try_milliseconds)
        .unwrap_or(Duration::MAX)
}

fn remaining(cooldown: Duration, since: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    let elapsed = now - since;
    cooldown.checked_sub(&elapsed).unwrap_or(if elapsed < Duration::zero() {
        Duration::MAX
    } else {
        Duration::MIN
    })
}

/// Whether a remaining wait is still in effect.
pub fn is_pending(remaining: Duration) -> bool {
    remaining > Duration::zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::game::Guess;
    use chrono::TimeZone;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    fn session_with(guesses: &[(i64, i64)]) -> Session {
        guesses.iter().fold(Session::new("sweet"), |s, (user, ms)| {
            s.with_guess(Guess::new("crane", *user, at(*ms)))
        })
    }

    #[test]
    fn test_turn_remaining_same_user() {
        let config = CooldownConfig::new(60_000, 0);
        let session = session_with(&[(1, 1_000), (2, 5_000)]);

        let remaining = config.turn_remaining(&session, 1, at(11_000), false);
        assert_eq!(remaining, Duration::milliseconds(50_000));
        assert!(is_pending(remaining));
    }

    #[test]
    fn test_turn_remaining_uses_latest_guess_of_user() {
        let config = CooldownConfig::new(60_000, 0);
        let session = session_with(&[(1, 1_000), (2, 5_000), (1, 30_000)]);

        let remaining = config.turn_remaining(&session, 1, at(40_000), false);
        assert_eq!(remaining, Duration::milliseconds(50_000));
    }

    #[test]
    fn test_turn_remaining_other_user_or_private() {
        let config = CooldownConfig::new(60_000, 0);
        let session = session_with(&[(1, 1_000)]);

        assert_eq!(config.turn_remaining(&session, 2, at(2_000), false), Duration::zero());
        assert_eq!(config.turn_remaining(&session, 1, at(2_000), true), Duration::zero());
    }

    #[test]
    fn test_turn_elapsed() {
        let config = CooldownConfig::new(60_000, 0);
        let session = session_with(&[(1, 0)]);

        assert!(!is_pending(config.turn_remaining(&session, 1, at(60_000), false)));
        assert!(!is_pending(config.turn_remaining(&session, 1, at(90_000), false)));
    }

    #[test]
    fn test_game_remaining_from_last_guess() {
        let config = CooldownConfig::new(0, 3_600_000);
        let session = session_with(&[(1, 0), (2, 600_000)]);

        assert_eq!(
            config.game_remaining(&session, at(1_200_000), false),
            Duration::milliseconds(3_000_000)
        );
        assert_eq!(config.game_remaining(&session, at(1_200_000), true), Duration::zero());
    }

    #[test]
    fn test_game_remaining_without_guesses_is_full() {
        let config = CooldownConfig::new(0, 3_600_000);
        let session = Session::new("sweet");

        assert_eq!(
            config.game_remaining(&session, at(99_999_999), false),
            Duration::milliseconds(3_600_000)
        );
    }

    #[test]
    fn test_config_json_names() {
        let config: CooldownConfig = serde_json::from_str(
            r#"{"turnCooldownMilliseconds": 900000, "gameCooldownMilliseconds": 0}"#,
        )
        .unwrap();
        assert_eq!(config, CooldownConfig::new(900_000, 0));
    }
}
