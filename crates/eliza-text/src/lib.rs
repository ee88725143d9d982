//! ELIZA text utilities: case folding, whole-word boundary detection,
//! and pronoun reflection.
//!
//! Everything in this crate is a pure function over string slices. Matching
//! elsewhere in the workspace is case-insensitive because both sides are run
//! through [`normalize`] first.
//!
//! This crate has no dependencies on other eliza crates.

use serde::{Deserialize, Serialize};

/// Maximum utterance length in bytes. Longer input is truncated, never rejected.
pub const MAX_UTTERANCE_LEN: usize = 512;

/// Truncate `text` to at most [`MAX_UTTERANCE_LEN`] bytes.
///
/// The cut is moved back to the nearest UTF-8 character boundary so the
/// result is always valid text.
pub fn truncate_utterance(text: &str) -> &str {
    if text.len() <= MAX_UTTERANCE_LEN {
        return text;
    }
    let mut end = MAX_UTTERANCE_LEN;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Fold every alphabetic character to lowercase.
///
/// Non-alphabetic characters pass through unchanged and the byte length is
/// preserved: a character whose lowercase form has a different encoded
/// length (e.g. `'İ'`) is left as is. Input longer than
/// [`MAX_UTTERANCE_LEN`] is truncated first.
///
/// # Examples
///
/// ```
/// use eliza_text::normalize;
///
/// assert_eq!(normalize("Tell me about your MOTHER!"), "tell me about your mother!");
/// ```
pub fn normalize(text: &str) -> String {
    truncate_utterance(text).chars().map(fold_char).collect()
}

fn fold_char(c: char) -> char {
    if !c.is_alphabetic() {
        return c;
    }
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) if l.len_utf8() == c.len_utf8() => l,
        _ => c,
    }
}

/// Check whether `text[start..end]` stands as a whole word.
///
/// The character before `start` must be absent (string start) or
/// non-alphanumeric, and likewise for the character at `end`.
///
/// `start` and `end` must lie on character boundaries.
pub fn is_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

/// A whole-word substitution rule used by [`reflect`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectionPair {
    /// Word to look for (lowercase).
    pub original: String,
    /// Replacement text.
    pub reflected: String,
}

impl ReflectionPair {
    pub fn new(original: impl Into<String>, reflected: impl Into<String>) -> Self {
        ReflectionPair {
            original: original.into(),
            reflected: reflected.into(),
        }
    }
}

/// Rewrite first/second-person words in `text` according to `pairs`.
///
/// 1. The working text is normalized, so capitalization is not preserved.
/// 2. Pairs are applied in table order. Each pair replaces every whole-word
///    occurrence of its `original`, scanning left to right.
/// 3. Text inserted by an earlier substitution is never scanned again, by the
///    same pair or a later one. This keeps a swap table such as
///    `i → you` followed by `you → me` from rewriting its own output.
///
/// Pairs with an empty `original` are ignored.
///
/// # Examples
///
/// ```
/// use eliza_text::{ReflectionPair, reflect};
///
/// let pairs = vec![
///     ReflectionPair::new("i", "you"),
///     ReflectionPair::new("am", "are"),
///     ReflectionPair::new("you", "me"),
/// ];
/// assert_eq!(reflect("I am happy", &pairs), "you are happy");
/// assert_eq!(reflect("himself", &pairs), "himself");
/// ```
pub fn reflect(text: &str, pairs: &[ReflectionPair]) -> String {
    let mut out = normalize(text);
    // Byte ranges of substituted text, sorted by start.
    let mut locked: Vec<(usize, usize)> = Vec::new();

    for pair in pairs {
        let original = normalize(&pair.original);
        if original.is_empty() {
            continue;
        }
        let step = original.chars().next().map_or(1, char::len_utf8);

        let mut from = 0;
        while let Some(offset) = out[from..].find(original.as_str()) {
            let start = from + offset;
            let end = start + original.len();

            let overlaps = locked.iter().any(|&(s, e)| s < end && start < e);
            if overlaps || !is_word_boundary(&out, start, end) {
                from = start + step;
                continue;
            }

            out.replace_range(start..end, &pair.reflected);
            let new_end = start + pair.reflected.len();
            for range in locked.iter_mut().filter(|r| r.0 >= end) {
                range.0 = range.0 - original.len() + pair.reflected.len();
                range.1 = range.1 - original.len() + pair.reflected.len();
            }
            let at = locked.partition_point(|r| r.0 < start);
            locked.insert(at, (start, new_end));

            from = new_end;
        }
    }

    out
}
