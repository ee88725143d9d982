//! ELIZA matching: quit detection, keyword lookup and response selection.
//!
//! All matching is unanchored substring containment over normalized text.
//! A keyword or quit phrase embedded in a longer word still matches, so
//! "exiting" ends a session through the "exit" phrase and "smothered" hits
//! the "mother" entry. That is the intended behavior of the table format.

use eliza_script::KeywordEntry;
use eliza_text::normalize;
use rand::Rng;
use tracing::debug;

/// Reply for a matched entry that has no responses.
pub const FALLBACK_RESPONSE: &str = "I'm not sure how to respond.";

/// Return `true` if normalized `text` contains any of `phrases`.
///
/// Phrases are expected in lowercase. Empty phrases are skipped.
pub fn is_quit<S: AsRef<str>>(text: &str, phrases: &[S]) -> bool {
    let text = normalize(text);
    phrases
        .iter()
        .map(AsRef::as_ref)
        .find(|phrase| !phrase.is_empty() && text.contains(phrase))
        .inspect(|phrase| debug!(phrase, "quit phrase detected"))
        .is_some()
}

/// A keyword table hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordMatch<'a> {
    /// Position of the entry in the table.
    pub index: usize,
    /// The matched entry.
    pub entry: &'a KeywordEntry,
}

impl<'a> KeywordMatch<'a> {
    pub fn keyword(&self) -> &'a str {
        &self.entry.keyword
    }
}

/// Find the first entry in `table` whose keyword occurs in `text`.
///
/// Table order is the only tie-break: an earlier entry wins even when a later
/// keyword is longer or more specific.
pub fn find_keyword<'a>(text: &str, table: &'a [KeywordEntry]) -> Option<KeywordMatch<'a>> {
    let text = normalize(text);
    let found = table
        .iter()
        .enumerate()
        .find(|(_, entry)| !entry.keyword.is_empty() && text.contains(entry.keyword.as_str()))
        .map(|(index, entry)| KeywordMatch { index, entry });

    match &found {
        Some(m) => debug!(index = m.index, keyword = m.keyword(), "keyword matched"),
        None => debug!("no keyword matched"),
    }
    found
}

/// Pick a reply for a (possibly absent) keyword entry.
///
/// - Matched entry with responses: uniform choice among them.
/// - Matched entry without responses: [`FALLBACK_RESPONSE`].
/// - No entry: uniform choice among `fillers` ([`FALLBACK_RESPONSE`] if empty).
pub fn select_response<'a, R: Rng>(
    entry: Option<&'a KeywordEntry>,
    fillers: &'a [String],
    rng: &mut R,
) -> &'a str {
    let pool = match entry {
        Some(entry) => entry.responses.as_slice(),
        None => fillers,
    };
    if pool.is_empty() {
        return FALLBACK_RESPONSE;
    }
    let idx = rng.random_range(0..pool.len());
    &pool[idx]
}
