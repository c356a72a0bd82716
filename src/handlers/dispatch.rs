//! Chat line classification.
//!
//! Admin syntax is recognized in every phase for players with a non-zero
//! level. Everything else depends on the phase:
//!
//! | Phase    | Recognized                          |
//! |----------|-------------------------------------|
//! | Question | correct answer, then `!h` / `!hint` |
//! | Waiting  | `!n` / `!next`                      |
//! | Idle     | `!start`                            |
//! | Locked   | nothing                             |

use crate::players::Player;
use crate::state::Phase;
use crate::store::Question;
use regex::Regex;
use std::sync::OnceLock;

/// What the engine should do with a chat line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatIntent {
    Admin { command: String, args: Vec<String> },
    Answer,
    Hint,
    Next,
    Start,
    Ignore,
}

macro_rules! pattern {
    ($name:ident, $re:literal) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($re).expect(concat!("invalid pattern ", $re)))
        }
    };
}

pattern!(admin_pattern, r"(?i)^!a(?:dmin)? (\S+) ?(.*?)$");
pattern!(hint_pattern, r"(?i)^!h(int)?");
pattern!(next_pattern, r"(?i)^!n(ext)?");
pattern!(start_pattern, r"(?i)^!start");

/// Classify `text` from `player` given the current phase and question.
pub fn classify(
    player: &Player,
    text: &str,
    phase: Phase,
    question: Option<&Question>,
) -> ChatIntent {
    if player.level > 0
        && let Some(caps) = admin_pattern().captures(text)
    {
        let command = caps[1].to_string();
        let args = caps
            .get(2)
            .map(|m| m.as_str().split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        return ChatIntent::Admin { command, args };
    }

    match phase {
        Phase::Question => {
            if question.is_some_and(|q| q.check_answer(text)) {
                ChatIntent::Answer
            } else if hint_pattern().is_match(text) {
                ChatIntent::Hint
            } else {
                ChatIntent::Ignore
            }
        }
        Phase::Waiting if next_pattern().is_match(text) => ChatIntent::Next,
        Phase::Idle if start_pattern().is_match(text) => ChatIntent::Start,
        _ => ChatIntent::Ignore,
    }
}
