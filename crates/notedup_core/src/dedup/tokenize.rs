//! Note text tokenizer.
//!
//! Lower-cases text, blanks out lightweight markup punctuation and keeps
//! whitespace-separated words longer than two characters.

use once_cell::sync::Lazy;
use regex::Regex;

/// Tokens with at most this many characters are dropped.
const MAX_DROPPED_TOKEN_CHARS: usize = 2;

static MARKUP_CHAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[#*_`\[\]()>~\-]").expect("valid markup char regex"));

/// Splits `text` into normalized tokens.
///
/// Each markup character becomes a single space, so stripping never joins two
/// words. Order and repeats are preserved; callers treat the output as a set.
pub fn tokenize(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let lowered = text.to_lowercase();
    let stripped = MARKUP_CHAR_RE.replace_all(&lowered, " ");
    stripped
        .split_whitespace()
        .filter(|token| token.chars().count() > MAX_DROPPED_TOKEN_CHARS)
        .map(str::to_string)
        .collect()
}
