//! ELIZA CLI — interactive keyword-driven responder.
//!
//! Thin wrapper over the `eliza` library crate.

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use eliza::{Eliza, Script, Session};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// ELIZA — a conversational responder driven by a keyword script.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// PRNG seed for reproducible replies.
    #[arg(long)]
    seed: Option<u64>,

    /// JSON script file replacing the built-in tables.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Reflect pronouns in replies before printing them.
    #[arg(long)]
    reflect: bool,

    /// Print replies only: no banner, no prompt.
    #[arg(long, short)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let script = match args.script {
        Some(ref path) => {
            let script = Script::load(path)
                .with_context(|| format!("cannot use script {}", path.display()))?;
            info!(path = %path.display(), keywords = script.keywords.len(), "script loaded");
            script
        }
        None => Script::builtin(),
    };

    let seed = args.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
    });
    debug!(seed, "seeding random source");

    let mut engine = Eliza::new(script, SmallRng::seed_from_u64(seed));
    engine.set_reflect_responses(args.reflect);

    let mut session = Session::new(engine);
    session.set_quiet(args.quiet);

    let stdin = io::stdin();
    let stdout = io::stdout();
    // A closed or failing stdout ends the conversation like end of input.
    match session.run(stdin.lock(), stdout.lock()) {
        Ok(end) => debug!(?end, "exiting"),
        Err(err) => debug!(%err, kind = ?err.kind(), "output closed; ending session"),
    }

    Ok(())
}
