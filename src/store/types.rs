//! Question and round record types.

use crate::players::PlayerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Round identifier assigned by the store.
pub type RoundId = u64;

/// A trivia question with its accepted answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: u64,
    pub question: String,
    #[serde(default)]
    pub categories: Vec<String>,
    /// Accepted answers. The first one is shown when the round ends.
    pub answers: Vec<String>,
    /// Hand-written hints, by hint number. Missing entries fall back to a
    /// masked answer.
    #[serde(default)]
    pub hints: Vec<String>,
}

impl Question {
    /// The answer revealed to players.
    pub fn primary_answer(&self) -> &str {
        self.answers.first().map(String::as_str).unwrap_or_default()
    }

    pub fn category_names(&self) -> String {
        self.categories.join(", ")
    }

    /// Compare a guess against every accepted answer, ignoring case,
    /// punctuation, repeated whitespace and a leading article. Answers made
    /// only of punctuation must be typed exactly, up to case and spacing.
    pub fn check_answer(&self, text: &str) -> bool {
        let guess = normalize(text);
        self.answers.iter().any(|answer| match normalize(answer) {
            expected if expected.is_empty() => {
                let raw = collapse_whitespace(text);
                !raw.is_empty() && collapse_whitespace(answer) == raw
            }
            expected => expected == guess,
        })
    }

    /// Text of hint number `n` (1-based). Higher numbers reveal more.
    pub fn hint(&self, n: u8) -> String {
        if let Some(text) = usize::from(n)
            .checked_sub(1)
            .and_then(|i| self.hints.get(i))
        {
            return text.clone();
        }
        mask_answer(self.primary_answer(), n)
    }
}

/// Symbols that change the meaning of a word ("C++", "C#", "AT&T").
const SIGNIFICANT_SYMBOLS: &[char] = &['+', '#', '&', '%'];

fn normalize(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || SIGNIFICANT_SYMBOLS.contains(&c) {
                c
            } else {
                ' '
            }
        })
        .collect();
    let words: Vec<&str> = cleaned.split_whitespace().collect();
    let words = match words.as_slice() {
        [first, rest @ ..] if !rest.is_empty() && matches!(*first, "the" | "a" | "an") => rest,
        all => all,
    };
    words.join(" ")
}

fn collapse_whitespace(text: &str) -> String {
    text.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Mask the letters of `answer`. Level 1 shows the first letter of each
/// word, level 2 every third letter, level 3 and above every other letter.
fn mask_answer(answer: &str, level: u8) -> String {
    let stride = match level {
        0 | 1 => usize::MAX,
        2 => 3,
        _ => 2,
    };
    answer
        .split(' ')
        .map(|word| {
            word.chars()
                .enumerate()
                .map(|(i, c)| {
                    if !c.is_alphanumeric() || i % stride == 0 {
                        c
                    } else {
                        '_'
                    }
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Player reference stored on a solved round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Solver {
    pub id: PlayerId,
    pub name: String,
}

/// One question/answer cycle as recorded by the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundRecord {
    pub id: RoundId,
    pub question: Question,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub solved: bool,
    pub solver: Option<Solver>,
    /// Seconds between the question and the winning answer.
    pub time_taken: Option<f64>,
    pub hints_used: u8,
    /// Streak count of the solver including this round.
    pub streak: u32,
    pub points: u32,
}

impl RoundRecord {
    pub fn new(id: RoundId, question: Question, started_at: DateTime<Utc>) -> Self {
        Self {
            id,
            question,
            started_at,
            ended_at: None,
            solved: false,
            solver: None,
            time_taken: None,
            hints_used: 0,
            streak: 0,
            points: 0,
        }
    }

    pub fn is_ended(&self) -> bool {
        self.ended_at.is_some()
    }

    /// Record the winning answer.
    pub fn record_solve(&mut self, solver: Solver, time_taken: f64, hints: u8, streak: u32) {
        self.solved = true;
        self.solver = Some(solver);
        self.time_taken = Some(time_taken);
        self.hints_used = hints;
        self.streak = streak;
        self.points = points_for(hints, streak);
    }

    pub fn end(&mut self, at: DateTime<Utc>) {
        self.ended_at.get_or_insert(at);
    }
}

/// 10 points minus 2 per hint (at least 1), plus 1 per extra streak win up to 5.
pub fn points_for(hints: u8, streak: u32) -> u32 {
    let base = 10u32.saturating_sub(2 * u32::from(hints)).max(1);
    base + streak.saturating_sub(1).min(5)
}
