//! Static word lists.
//!
//! Two sets are loaded once at startup: answers (words that may be chosen as
//! the secret) and accepted guesses. Every answer is also an accepted guess.

use std::collections::HashSet;

use rand::seq::IteratorRandom;
use rand::Rng;

use crate::error::WordsError;

/// Length of every playable word.
pub const WORD_LENGTH: usize = 5;

const ANSWERS: &str = include_str!("../../assets/answers.txt");
const GUESSES: &str = include_str!("../../assets/guesses.txt");

/// Answer and guess dictionaries.
#[derive(Debug, Clone)]
pub struct WordStore {
    answers: HashSet<String>,
    accepted: HashSet<String>,
}

impl WordStore {
    /// Build from the word lists embedded in the crate.
    pub fn embedded() -> Result<Self, WordsError> {
        Self::from_lists(ANSWERS.lines(), GUESSES.lines())
    }

    /// Build from arbitrary lists.
    ///
    /// Words are trimmed and lowercased; blank entries are skipped. The
    /// accepted set is the union of both lists.
    pub fn from_lists<A, G>(answers: A, guesses: G) -> Result<Self, WordsError>
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        G: IntoIterator,
        G::Item: AsRef<str>,
    {
        let answers: HashSet<String> = normalize(answers).collect();
        if answers.is_empty() {
            return Err(WordsError::EmptyAnswers);
        }

        let mut accepted: HashSet<String> = normalize(guesses).collect();
        accepted.extend(answers.iter().cloned());

        tracing::debug!(
            answers = answers.len(),
            accepted = accepted.len(),
            "Loaded word lists"
        );

        Ok(Self { answers, accepted })
    }

    /// Check if a word may be chosen as a secret.
    pub fn is_answer_candidate(&self, word: &str) -> bool {
        self.answers.contains(word)
    }

    /// Check if a word is in the dictionary of accepted inputs.
    pub fn is_accepted_guess(&self, word: &str) -> bool {
        self.accepted.contains(word)
    }

    /// Full validity check for a submitted word: right length and known.
    pub fn is_valid_guess(&self, word: &str) -> bool {
        word.chars().count() == WORD_LENGTH && self.is_accepted_guess(word)
    }

    /// Pick a secret uniformly from the answers.
    pub fn random_answer<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        self.answers
            .iter()
            .choose(rng)
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn answer_count(&self) -> usize {
        self.answers.len()
    }

    pub fn guess_count(&self) -> usize {
        self.accepted.len()
    }
}

fn normalize<I>(words: I) -> impl Iterator<Item = String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    words
        .into_iter()
        .map(|w| w.as_ref().trim().to_lowercase())
        .filter(|w| !w.is_empty())
}
