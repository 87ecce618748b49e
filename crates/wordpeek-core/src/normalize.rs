use unicode_normalization::UnicodeNormalization;

use crate::lookup::LookupToken;

pub const MIN_TOKEN_CHARS: usize = 2;
pub const MAX_TOKEN_CHARS: usize = 45;

fn is_word_char(c: char) -> bool {
    c.is_alphabetic() || c == '\'' || c == '-'
}

fn is_separator(c: char) -> bool {
    c == '\'' || c == '-'
}

/// Turns raw selected text into a single lookup token.
///
/// Runs of anything other than letters, apostrophes and hyphens collapse to
/// one space, only the first word is kept and separators left over from a
/// partial selection are stripped from both ends. Returns `None` when the
/// remaining word is shorter than 2 or longer than 45 characters.
pub fn normalize(raw: &str) -> Option<LookupToken> {
    // NFC so decomposed accents are letters
    let composed: String = raw.nfc().collect();
    let lowered = composed.trim().to_lowercase();

    let mut cleaned = String::with_capacity(lowered.len());
    let mut in_gap = false;
    for c in lowered.chars() {
        if is_word_char(c) {
            cleaned.push(c);
            in_gap = false;
        } else if !in_gap {
            cleaned.push(' ');
            in_gap = true;
        }
    }

    let first = cleaned.split_whitespace().next()?;
    let word = first.trim_matches(is_separator);

    let len = word.chars().count();
    if !(MIN_TOKEN_CHARS..=MAX_TOKEN_CHARS).contains(&len) {
        return None;
    }

    Some(LookupToken::new(word.to_string()))
}
