//! User-facing replies.
//!
//! Turns engine results into what the chat should show. Image rendering of
//! the board is left to the transport; [`render_text_board`] is the plain text
//! fallback for when that fails.

use chrono::Duration;

use crate::state::evaluate::{evaluate, LetterStatus};
use crate::state::{Outcome, Rejection, Session};

/// One message to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    /// The current board, rendered by the transport
    Board(Session),
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

/// Messages for an applied guess, in sending order.
pub fn outcome_replies(outcome: &Outcome) -> Vec<Reply> {
    match outcome {
        Outcome::Start { session } => vec![
            Reply::text("New game started!"),
            Reply::Board(session.clone()),
        ],
        Outcome::Continue { session } => vec![Reply::Board(session.clone())],
        Outcome::End { session, success } => {
            let closing = if *success {
                "You guessed the word!".to_string()
            } else {
                format!("Game over! The word was: {}", session.secret_word().to_uppercase())
            };
            vec![Reply::Board(session.clone()), Reply::Text(closing)]
        }
    }
}

/// Message for a refused guess.
pub fn rejection_reply(rejection: &Rejection) -> Reply {
    match rejection {
        Rejection::InvalidWord => Reply::text("That's not a word!"),
        Rejection::TurnCooldown { remaining } => Reply::Text(format!(
            "You need to wait {} for your turn!",
            humanize(*remaining)
        )),
        Rejection::GameCooldown { remaining } => {
            Reply::Text(format!("You need to wait {}!", humanize(*remaining)))
        }
    }
}

/// Describe a wait in words, e.g. "about 2 hours".
pub fn humanize(duration: Duration) -> String {
    let seconds = duration.num_seconds().max(0);
    let minutes = (seconds + 30) / 60;

    match minutes {
        0 => "less than a minute".to_string(),
        1 => "1 minute".to_string(),
        2..=44 => format!("{} minutes", minutes),
        45..=89 => "about 1 hour".to_string(),
        90..=1439 => format!("about {} hours", (minutes + 30) / 60),
        1440..=2519 => "1 day".to_string(),
        _ => format!("{} days", (minutes + 720) / 1440),
    }
}

/// Plain text board: `[c]` correct, `(c)` present, ` c ` absent.
///
/// One line per guess, each wrapped in backticks for monospace display.
pub fn render_text_board(session: &Session) -> String {
    session
        .guesses()
        .iter()
        .map(|guess| {
            let row: String = evaluate(&guess.word, session.secret_word())
                .into_iter()
                .map(|(c, status)| match status {
                    LetterStatus::Correct => format!("[{}]", c),
                    LetterStatus::Present => format!("({})", c),
                    LetterStatus::Absent => format!(" {} ", c),
                })
                .collect();
            format!("`{}`", row)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Guess;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn session(secret: &str, words: &[&str]) -> Session {
        words.iter().fold(Session::new(secret), |s, w| {
            s.with_guess(Guess::new(*w, 1, Utc.timestamp_millis_opt(0).unwrap()))
        })
    }

    #[test]
    fn test_start_replies() {
        let s = session("sweet", &["crane"]);
        assert_eq!(
            outcome_replies(&Outcome::Start { session: s.clone() }),
            vec![Reply::Text("New game started!".into()), Reply::Board(s)]
        );
    }

    #[test]
    fn test_continue_replies() {
        let s = session("sweet", &["crane"]);
        assert_eq!(
            outcome_replies(&Outcome::Continue { session: s.clone() }),
            vec![Reply::Board(s)]
        );
    }

    #[test]
    fn test_end_replies() {
        let s = session("sweet", &["sweet"]);
        assert_eq!(
            outcome_replies(&Outcome::End {
                session: s.clone(),
                success: true
            }),
            vec![Reply::Board(s.clone()), Reply::Text("You guessed the word!".into())]
        );
        assert_eq!(
            outcome_replies(&Outcome::End {
                session: s.clone(),
                success: false
            })[1],
            Reply::Text("Game over! The word was: SWEET".into())
        );
    }

    #[test]
    fn test_rejection_replies() {
        assert_eq!(
            rejection_reply(&Rejection::InvalidWord),
            Reply::Text("That's not a word!".into())
        );
        assert_eq!(
            rejection_reply(&Rejection::TurnCooldown {
                remaining: Duration::minutes(14)
            }),
            Reply::Text("You need to wait 14 minutes for your turn!".into())
        );
        assert_eq!(
            rejection_reply(&Rejection::GameCooldown {
                remaining: Duration::minutes(100)
            }),
            Reply::Text("You need to wait about 2 hours!".into())
        );
    }

    #[test]
    fn test_humanize() {
        assert_eq!(humanize(Duration::seconds(10)), "less than a minute");
        assert_eq!(humanize(Duration::seconds(45)), "1 minute");
        assert_eq!(humanize(Duration::seconds(150)), "3 minutes");
        assert_eq!(humanize(Duration::minutes(50)), "about 1 hour");
        assert_eq!(humanize(Duration::hours(5)), "about 5 hours");
        assert_eq!(humanize(Duration::hours(30)), "1 day");
        assert_eq!(humanize(Duration::days(3)), "3 days");
        assert_eq!(humanize(Duration::seconds(-5)), "less than a minute");
    }

    #[test]
    fn test_render_text_board() {
        let s = session("sweet", &["geese", "sweet"]);
        assert_eq!(
            render_text_board(&s),
            "` g (e)[e](s) e `\n`[s][w][e][e][t]`"
        );
    }
}
