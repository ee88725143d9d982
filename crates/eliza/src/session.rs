//! The read-respond loop.
//!
//! A [`Session`] is a small state machine:
//!
//! ```text
//! AwaitingInput --line--> Processing --reply--> AwaitingInput
//!       |                      |
//!      EOF                  farewell
//!       v                      v
//!   Terminated <---------------+
//! ```
//!
//! A failed read is treated exactly like end of input. Only write failures
//! surface as errors.
//!
//! A session is single-use: once terminated, further calls to
//! [`Session::run`] read nothing, write nothing and return the recorded
//! [`SessionEnd`].

use std::io::{self, BufRead, Write};

use rand::Rng;
use tracing::debug;

use crate::{Eliza, Reply};

/// Label written before every reply.
pub const SPEAKER_LABEL: &str = "ELIZA: ";

/// Prompt written before every read, unless the session is quiet.
pub const PROMPT: &str = "You: ";

/// Where the session currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    AwaitingInput,
    Processing(String),
    Terminated(SessionEnd),
}

/// Why a session ended. Both are clean exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// A quit phrase was entered.
    Quit,
    /// The input source ran dry (or failed to read).
    InputExhausted,
}

/// Drives an [`Eliza`] engine over a line source and a line sink.
pub struct Session<R: Rng> {
    engine: Eliza<R>,
    state: SessionState,
    /// Suppress the banner, prompts and spacing lines.
    quiet: bool,
}

impl<R: Rng> Session<R> {
    pub fn new(engine: Eliza<R>) -> Self {
        Session {
            engine,
            state: SessionState::AwaitingInput,
            quiet: false,
        }
    }

    /// Only write replies: no banner, no prompt, no blank lines.
    pub fn set_quiet(&mut self, quiet: bool) {
        self.quiet = quiet;
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Run until a quit phrase or end of input.
    pub fn run<I: BufRead, W: Write>(
        &mut self,
        mut input: I,
        mut output: W,
    ) -> io::Result<SessionEnd> {
        if let SessionState::Terminated(end) = self.state {
            return Ok(end);
        }

        if !self.quiet {
            for line in &self.engine.script().banner {
                writeln!(output, "{line}")?;
            }
            writeln!(output)?;
        }

        loop {
            // A write error leaves the session terminated without a recorded quit.
            let state = std::mem::replace(
                &mut self.state,
                SessionState::Terminated(SessionEnd::InputExhausted),
            );
            self.state = match state {
                SessionState::AwaitingInput => {
                    if !self.quiet {
                        write!(output, "{PROMPT}")?;
                        output.flush()?;
                    }
                    match read_line(&mut input) {
                        Some(line) => SessionState::Processing(line),
                        None => {
                            if !self.quiet {
                                writeln!(output)?;
                            }
                            SessionState::Terminated(SessionEnd::InputExhausted)
                        }
                    }
                }
                SessionState::Processing(line) => match self.engine.respond(&line) {
                    Reply::Farewell(text) => {
                        writeln!(output, "{SPEAKER_LABEL}{text}")?;
                        SessionState::Terminated(SessionEnd::Quit)
                    }
                    Reply::Response(text) => {
                        writeln!(output, "{SPEAKER_LABEL}{text}")?;
                        if !self.quiet {
                            writeln!(output)?;
                        }
                        SessionState::AwaitingInput
                    }
                },
                SessionState::Terminated(end) => {
                    output.flush()?;
                    debug!(?end, "session terminated");
                    return Ok(end);
                }
            };
        }
    }
}

/// Read one raw line, terminator included. `None` on EOF or read failure.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected.
fn read_line<I: BufRead>(input: &mut I) -> Option<String> {
    let mut buf = Vec::new();
    match input.read_until(b'\n', &mut buf) {
        Ok(0) => None,
        Ok(_) => Some(String::from_utf8_lossy(&buf).into_owned()),
        Err(err) => {
            debug!(%err, "input read failed; treating as end of input");
            None
        }
    }
}
