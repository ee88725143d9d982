//! ELIZA script: the static tables that drive a conversation.
//!
//! A [`Script`] bundles four tables plus a little presentation text:
//!
//! - **keywords**: ordered [`KeywordEntry`] rows. Order is match priority.
//! - **reflections**: ordered [`ReflectionPair`] rules for pronoun swapping.
//! - **fillers**: generic replies used when no keyword matches.
//! - **quit phrases**: substrings that end the session.
//!
//! Scripts are loaded once (built in, or from a JSON file) and never mutated
//! afterwards, so they can be shared freely between sessions.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use eliza_text::{MAX_UTTERANCE_LEN, normalize};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

pub use eliza_text::ReflectionPair;

/// One row of the keyword table: a trigger substring and its canned replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordEntry {
    /// Lowercase trigger, unique within a script.
    pub keyword: String,
    /// Replies chosen from uniformly at random.
    pub responses: Vec<String>,
}

impl KeywordEntry {
    pub fn new<S: Into<String>>(
        keyword: impl Into<String>,
        responses: impl IntoIterator<Item = S>,
    ) -> Self {
        KeywordEntry {
            keyword: keyword.into(),
            responses: responses.into_iter().map(Into::into).collect(),
        }
    }
}

/// Errors raised while loading or validating a script.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid script JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("script has no filler responses")]
    EmptyFillers,

    #[error("keyword entry {index} has an empty keyword")]
    EmptyKeyword { index: usize },

    #[error(
        "keyword {keyword:?} is {len} bytes, longer than the {max}-byte utterance limit",
        max = MAX_UTTERANCE_LEN
    )]
    KeywordTooLong { keyword: String, len: usize },

    #[error("keyword {keyword:?} must be lowercase")]
    KeywordNotLowercase { keyword: String },

    #[error("keyword {keyword:?} is declared more than once")]
    DuplicateKeyword { keyword: String },

    #[error("quit phrase {index} is empty")]
    EmptyQuitPhrase { index: usize },

    #[error(
        "quit phrase {phrase:?} is {len} bytes, longer than the {max}-byte utterance limit",
        max = MAX_UTTERANCE_LEN
    )]
    QuitPhraseTooLong { phrase: String, len: usize },

    #[error("quit phrase {phrase:?} must be lowercase")]
    QuitPhraseNotLowercase { phrase: String },

    #[error("reflection pair {index} has an empty original word")]
    EmptyReflection { index: usize },
}

/// The complete set of tables for one responder.
///
/// In JSON form `keywords` and `fillers` are required; every other field
/// falls back to the built-in table when omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    pub keywords: Vec<KeywordEntry>,
    #[serde(default = "builtin_reflections")]
    pub reflections: Vec<ReflectionPair>,
    pub fillers: Vec<String>,
    #[serde(default = "builtin_quit_phrases")]
    pub quit_phrases: Vec<String>,
    /// Reply emitted when a quit phrase ends the session.
    #[serde(default = "builtin_farewell")]
    pub farewell: String,
    /// Lines printed once at session start.
    #[serde(default = "builtin_banner")]
    pub banner: Vec<String>,
}

impl Default for Script {
    fn default() -> Self {
        Script::builtin()
    }
}

impl Script {
    /// The built-in script: ten keyword entries, ten reflection pairs,
    /// eight fillers and seven quit phrases.
    pub fn builtin() -> Self {
        Script {
            keywords: KEYWORDS
                .iter()
                .map(|(keyword, responses)| {
                    KeywordEntry::new(*keyword, responses.iter().copied())
                })
                .collect(),
            reflections: builtin_reflections(),
            fillers: FILLERS.iter().map(|s| s.to_string()).collect(),
            quit_phrases: builtin_quit_phrases(),
            farewell: builtin_farewell(),
            banner: builtin_banner(),
        }
    }

    /// Parse and validate a script from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        let script: Script = serde_json::from_str(json)?;
        script.validate()?;
        Ok(script)
    }

    /// Read, parse and validate a JSON script file.
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let content = fs::read_to_string(path).map_err(|source| ScriptError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Script::from_json(&content)
    }

    /// Check the table invariants the matcher relies on.
    ///
    /// An entry with no responses is accepted with a warning; the selector
    /// answers it with a fixed fallback.
    pub fn validate(&self) -> Result<(), ScriptError> {
        if self.fillers.is_empty() {
            return Err(ScriptError::EmptyFillers);
        }

        let mut seen = HashSet::new();
        for (index, entry) in self.keywords.iter().enumerate() {
            if entry.keyword.is_empty() {
                return Err(ScriptError::EmptyKeyword { index });
            }
            // Input is truncated before matching, so a longer keyword never matches.
            if entry.keyword.len() > MAX_UTTERANCE_LEN {
                return Err(ScriptError::KeywordTooLong {
                    keyword: entry.keyword.clone(),
                    len: entry.keyword.len(),
                });
            }
            if normalize(&entry.keyword) != entry.keyword {
                return Err(ScriptError::KeywordNotLowercase {
                    keyword: entry.keyword.clone(),
                });
            }
            if !seen.insert(entry.keyword.as_str()) {
                return Err(ScriptError::DuplicateKeyword {
                    keyword: entry.keyword.clone(),
                });
            }
            if entry.responses.is_empty() {
                warn!(keyword = %entry.keyword, "keyword entry has no responses");
            }
        }

        for (index, phrase) in self.quit_phrases.iter().enumerate() {
            if phrase.is_empty() {
                return Err(ScriptError::EmptyQuitPhrase { index });
            }
            if phrase.len() > MAX_UTTERANCE_LEN {
                return Err(ScriptError::QuitPhraseTooLong {
                    phrase: phrase.clone(),
                    len: phrase.len(),
                });
            }
            if normalize(phrase) != *phrase {
                return Err(ScriptError::QuitPhraseNotLowercase {
                    phrase: phrase.clone(),
                });
            }
        }

        if let Some(index) = self.reflections.iter().position(|p| p.original.is_empty()) {
            return Err(ScriptError::EmptyReflection { index });
        }

        Ok(())
    }
}

const KEYWORDS: &[(&str, &[&str])] = &[
    (
        "hello",
        &[
            "Hello! How are you feeling today?",
            "Hi there! What brings you here?",
            "Greetings! Tell me, how can I help?",
        ],
    ),
    (
        "help",
        &[
            "I'm here to listen. What troubles you?",
            "Tell me more about what you need help with.",
            "I'll do my best to assist you.",
        ],
    ),
    (
        "mother",
        &[
            "Tell me more about your mother.",
            "How does your mother make you feel?",
            "What does your mother mean to you?",
        ],
    ),
    (
        "father",
        &[
            "Let's talk about your father.",
            "How does your father make you feel?",
            "What is your relationship with your father?",
        ],
    ),
    (
        "love",
        &[
            "That's a powerful emotion. Tell me more.",
            "Love is an important feeling. What about it?",
            "How does love affect your life?",
        ],
    ),
    (
        "hate",
        &[
            "Hate is strong. Why do you feel this way?",
            "Tell me what provokes such strong feelings.",
            "What is it about this that angers you?",
        ],
    ),
    (
        "dream",
        &[
            "Dreams can be very revealing. Tell me more.",
            "What do your dreams mean to you?",
            "Have you had this dream before?",
        ],
    ),
    (
        "computer",
        &[
            "Computers are interesting. Why do you mention them?",
            "Do you have feelings about computers?",
            "What do computers mean to you?",
        ],
    ),
    (
        "think",
        &[
            "Do you often think about such things?",
            "What else do you think about?",
            "I'm interested in your thoughts.",
        ],
    ),
    (
        "feel",
        &[
            "Tell me more about these feelings.",
            "How long have you felt this way?",
            "What causes these feelings?",
        ],
    ),
];

// Contractions and the -self forms come before the bare pronouns they contain.
const REFLECTIONS: &[(&str, &str)] = &[
    ("i'm", "you're"),
    ("i've", "you've"),
    ("i'll", "you'll"),
    ("myself", "yourself"),
    ("yourself", "myself"),
    ("me", "you"),
    ("i", "you"),
    ("am", "are"),
    ("my", "your"),
    ("you", "me"),
];

const FILLERS: &[&str] = &[
    "I see. Tell me more.",
    "That's interesting. Go on.",
    "Hmm, I'm listening.",
    "Please continue.",
    "Yes? And then?",
    "I see what you mean.",
    "How does that make you feel?",
    "Why do you think that?",
];

const QUIT_PHRASES: &[&str] = &["bye", "goodbye", "exit", "quit", "bye!", "see you", "goodbye!"];

const FAREWELL: &str = "Goodbye! It was nice talking with you.";

const BANNER: &[&str] = &[
    "ELIZA - Conversational AI",
    "========================",
    "Hello, I'm ELIZA. Tell me about yourself.",
    "Type 'quit' to exit.",
];

fn builtin_reflections() -> Vec<ReflectionPair> {
    REFLECTIONS
        .iter()
        .map(|(original, reflected)| ReflectionPair::new(*original, *reflected))
        .collect()
}

fn builtin_quit_phrases() -> Vec<String> {
    QUIT_PHRASES.iter().map(|s| s.to_string()).collect()
}

fn builtin_farewell() -> String {
    FAREWELL.to_string()
}

fn builtin_banner() -> Vec<String> {
    BANNER.iter().map(|s| s.to_string()).collect()
}
