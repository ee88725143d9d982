//! ELIZA conversational engine: a keyword-table responder.
//!
//! This is the facade crate that wires together the lower-level components:
//! - [`eliza_text`]: normalization, word boundaries, pronoun reflection
//! - [`eliza_script`]: keyword, reflection, filler and quit-phrase tables
//! - [`eliza_match`]: quit detection, keyword lookup, response selection
//!
//! The [`session`] module drives the read-respond loop over any line source.
//!
//! # Quick Start
//!
//! ```
//! use eliza::{Eliza, Reply, Script};
//! use rand::rngs::SmallRng;
//! use rand::SeedableRng;
//!
//! let mut eliza = Eliza::new(Script::builtin(), SmallRng::seed_from_u64(42));
//! match eliza.respond("I keep dreaming about computers") {
//!     Reply::Response(text) => println!("{text}"),
//!     Reply::Farewell(text) => println!("{text}"),
//! }
//! ```

pub mod session;

use eliza_match::{find_keyword, is_quit, select_response};
use eliza_text::{reflect, truncate_utterance};
use rand::Rng;
use thiserror::Error;
use tracing::debug;

// Re-export types that consumers (like the CLI) need.
pub use eliza_match::{FALLBACK_RESPONSE, KeywordMatch};
pub use eliza_script::{KeywordEntry, ReflectionPair, Script, ScriptError};
pub use session::{Session, SessionEnd, SessionState};

/// The outcome of one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A reply; the conversation continues.
    Response(String),
    /// A quit phrase was seen; the conversation is over.
    Farewell(String),
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Response(text) | Reply::Farewell(text) => text,
        }
    }

    pub fn is_farewell(&self) -> bool {
        matches!(self, Reply::Farewell(_))
    }
}

/// The ELIZA engine.
///
/// Owns its script and its random source. Generic over the PRNG type `R` so
/// tests can seed it; each concurrent conversation needs its own engine.
pub struct Eliza<R: Rng> {
    script: Script,
    /// Route selected responses through [`reflect`] before returning them.
    reflect_responses: bool,
    rng: R,
}

impl<R: Rng> Eliza<R> {
    /// Create an engine over `script`. Reflection of responses starts off.
    pub fn new(script: Script, rng: R) -> Self {
        Eliza {
            script,
            reflect_responses: false,
            rng,
        }
    }

    /// Enable or disable reflection of selected responses.
    pub fn set_reflect_responses(&mut self, enabled: bool) {
        self.reflect_responses = enabled;
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    /// Process one line of user input.
    ///
    /// A single trailing line terminator (`\n` or `\r\n`) is stripped and the
    /// line is truncated to the maximum utterance length. Quit phrases take
    /// priority over keywords.
    pub fn respond(&mut self, input: &str) -> Reply {
        let line = strip_line_terminator(input);
        let line = truncate_utterance(line);

        if is_quit(line, &self.script.quit_phrases) {
            return Reply::Farewell(self.script.farewell.clone());
        }

        let matched = find_keyword(line, &self.script.keywords);
        let selected = select_response(
            matched.map(|m| m.entry),
            &self.script.fillers,
            &mut self.rng,
        );

        if self.reflect_responses {
            let reflected = reflect(selected, &self.script.reflections);
            debug!(selected, reflected = %reflected, "reflected response");
            Reply::Response(reflected)
        } else {
            Reply::Response(selected.to_string())
        }
    }

    /// Apply the script's reflection table to `text`.
    pub fn reflect(&self, text: &str) -> String {
        reflect(text, &self.script.reflections)
    }
}

/// Remove one trailing `\n` (and a `\r` directly before it), if present.
fn strip_line_terminator(input: &str) -> &str {
    match input.strip_suffix('\n') {
        Some(rest) => rest.strip_suffix('\r').unwrap_or(rest),
        None => input,
    }
}

/// Errors from an external question-answering gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("gateway unavailable: {0}")]
    Unavailable(String),

    #[error("gateway returned no answer")]
    NoAnswer,
}

/// A source of answers to free-form questions.
///
/// This is the boundary a remote gateway client would implement. The engine
/// implements it too, answering with canned responses, so front ends written
/// against `Gateway` can run offline.
pub trait Gateway {
    fn ask(&mut self, query: &str) -> Result<String, GatewayError>;
}

impl<R: Rng> Gateway for Eliza<R> {
    fn ask(&mut self, query: &str) -> Result<String, GatewayError> {
        if query.trim().is_empty() {
            return Err(GatewayError::NoAnswer);
        }
        Ok(self.respond(query).text().to_string())
    }
}
