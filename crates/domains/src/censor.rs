//! Render-time filter for banned words.
//!
//! Stored comment text is never modified; callers run [`censor`] when they
//! display content.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

pub const BANNED_WORDS: [&str; 4] = ["Bitch", "Bastard", "Bloody", "Bollocks"];

/// Replacement for every banned word occurrence.
pub const MASK: &str = "***";

static BANNED: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(r"(?i)\b(?:{})\b", BANNED_WORDS.join("|"));
    Regex::new(&pattern).expect("banned word list compiles to a valid pattern")
});

/// Masks whole-word, case-insensitive matches of the banned words.
/// Borrows the input when nothing matched.
pub fn censor(text: &str) -> Cow<'_, str> {
    BANNED.replace_all(text, MASK)
}
