//! Entry identifiers and text comparison keys.
//!
//! Entry names change between roster revisions: accents come and go,
//! punctuation is added, artists get renamed. Everything in the matcher
//! compares through the keys built here.

use std::collections::BTreeSet;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Deterministic entry id: `artist-song`, lowercased, each whitespace run
/// collapsed to a single hyphen.
pub fn create_entry_id(artist: &str, song: &str) -> String {
    let raw = format!("{artist}-{song}").to_lowercase();
    let mut id = String::with_capacity(raw.len());
    let mut in_space = false;
    for c in raw.chars() {
        if c.is_whitespace() {
            if !in_space {
                id.push('-');
            }
            in_space = true;
        } else {
            id.push(c);
            in_space = false;
        }
    }
    id
}

/// Lowercase and strip diacritics, keeping whitespace and punctuation.
pub fn fold_text(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Comparison key insensitive to accents, punctuation and casing.
/// Only `[a-z0-9]` survives.
pub fn normalize_text(text: &str) -> String {
    fold_text(text)
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Word set of a name: folded text split on whitespace, each word
/// normalized, empty words dropped.
pub fn word_tokens(text: &str) -> BTreeSet<String> {
    fold_text(text)
        .split_whitespace()
        .map(normalize_text)
        .filter(|w| !w.is_empty())
        .collect()
}
