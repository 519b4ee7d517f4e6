//! Guess evaluation.
//!
//! Maps a guess against the secret into one status per letter, with the usual
//! duplicate-letter handling: a letter is only marked present as many times as
//! the secret still has unmatched copies of it.

use std::collections::HashMap;
use std::fmt;

/// Status of one letter of a guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LetterStatus {
    /// Right letter, right position
    Correct,
    /// Letter is in the secret at another position
    Present,
    /// Letter is not in the secret (or all copies are accounted for)
    Absent,
}

impl LetterStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Correct => "correct",
            Self::Present => "present",
            Self::Absent => "absent",
        }
    }
}

impl fmt::Display for LetterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evaluate `guess` against `secret`.
///
/// Returns one `(letter, status)` pair per character of the guess. Both
/// words are expected to have the same length.
pub fn evaluate(guess: &str, secret: &str) -> Vec<(char, LetterStatus)> {
    let guess: Vec<char> = guess.chars().collect();
    let secret: Vec<char> = secret.chars().collect();

    let mut in_secret: HashMap<char, usize> = HashMap::new();
    for c in &secret {
        *in_secret.entry(*c).or_default() += 1;
    }

    let is_correct = |i: usize| secret.get(i) == guess.get(i);

    // Correct matches are consumed up front, wherever they sit.
    let mut consumed: HashMap<char, usize> = HashMap::new();
    for (i, c) in guess.iter().enumerate() {
        if is_correct(i) {
            *consumed.entry(*c).or_default() += 1;
        }
    }

    guess
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            if is_correct(i) {
                return (c, LetterStatus::Correct);
            }
            let used = consumed.entry(c).or_default();
            if *used < in_secret.get(&c).copied().unwrap_or(0) {
                *used += 1;
                (c, LetterStatus::Present)
            } else {
                (c, LetterStatus::Absent)
            }
        })
        .collect()
}
