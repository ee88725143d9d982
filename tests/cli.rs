//! CLI integration tests for the `eliza` binary.
//!
//! Uses `assert_cmd` to spawn the binary as a subprocess, pipe stdin,
//! and assert on stdout/stderr/exit code.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

/// Path to the ELIZA data directory (bundled in the repo).
fn data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
}

fn eliza_cmd() -> Command {
    Command::from(cargo_bin_cmd!("eliza"))
}

const FAREWELL: &str = "ELIZA: Goodbye! It was nice talking with you.";

// ---------------------------------------------------------------------------
// Basic CLI behavior
// ---------------------------------------------------------------------------

#[test]
fn help_flag() {
    eliza_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("keyword script"));
}

#[test]
fn version_flag() {
    eliza_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("eliza-cli"));
}

#[test]
fn unknown_flag_fails() {
    eliza_cmd().arg("--nonsense").assert().failure();
}

// ---------------------------------------------------------------------------
// Conversation loop
// ---------------------------------------------------------------------------

#[test]
fn banner_on_startup() {
    eliza_cmd()
        .args(["--seed", "42"])
        .write_stdin("quit\n")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("ELIZA - Conversational AI"))
        .stdout(predicate::str::contains("Hello, I'm ELIZA. Tell me about yourself."))
        .stdout(predicate::str::contains("You: "));
}

#[test]
fn hello_then_bye() {
    eliza_cmd()
        .args(["--seed", "42", "--quiet"])
        .write_stdin("hello\nbye\n")
        .assert()
        .success()
        .stdout(predicate::function(|output: &str| {
            let lines: Vec<&str> = output.lines().collect();
            lines.len() == 2 && lines[0].starts_with("ELIZA: ") && lines[1] == FAREWELL
        }));
}

#[test]
fn quit_phrase_inside_sentence() {
    eliza_cmd()
        .args(["--seed", "42", "--quiet"])
        .write_stdin("I think I will EXIT now\nhello\n")
        .assert()
        .success()
        .stdout(predicate::eq(format!("{FAREWELL}\n")));
}

#[test]
fn eof_exits_cleanly() {
    eliza_cmd()
        .args(["--seed", "42", "--quiet"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn eof_after_turns_exits_cleanly() {
    eliza_cmd()
        .args(["--seed", "42", "--quiet"])
        .write_stdin("hello\nmy mother\n")
        .assert()
        .success()
        .stdout(predicate::function(|output: &str| {
            output.matches("ELIZA:").count() == 2
        }));
}

#[test]
fn keyword_reply_comes_from_entry() {
    let expected = [
        "Tell me more about your mother.",
        "How does your mother make you feel?",
        "What does your mother mean to you?",
    ];
    eliza_cmd()
        .args(["--seed", "7", "--quiet"])
        .write_stdin("Tell me about your MOTHER\n")
        .assert()
        .success()
        .stdout(predicate::function(move |output: &str| {
            output
                .trim_end()
                .strip_prefix("ELIZA: ")
                .is_some_and(|reply| expected.contains(&reply))
        }));
}

#[test]
fn closed_stdout_exits_cleanly() {
    let mut child = std::process::Command::new(env!("CARGO_BIN_EXE_eliza"))
        .args(["--seed", "1", "--quiet"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("should spawn");

    // Reader goes away before the first reply is written.
    drop(child.stdout.take());

    let mut stdin = child.stdin.take().expect("stdin is piped");
    for _ in 0..5000 {
        if stdin.write_all(b"hello\n").is_err() {
            break;
        }
    }
    drop(stdin);

    let output = child.wait_with_output().expect("should finish");
    assert!(output.status.success(), "exit status: {:?}", output.status);
    assert!(
        !String::from_utf8_lossy(&output.stderr).contains("Error"),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

// ---------------------------------------------------------------------------
// Reflection
// ---------------------------------------------------------------------------

#[test]
fn reflect_flag_rewrites_replies() {
    let path = std::env::temp_dir().join("eliza_cli_test_reflect.json");
    std::fs::write(
        &path,
        r#"{"keywords": [{"keyword": "pet", "responses": ["I am fond of my pet."]}], "fillers": ["Go on."]}"#,
    )
    .unwrap();

    eliza_cmd()
        .args(["--seed", "1", "--quiet", "--script", path.to_str().unwrap()])
        .write_stdin("my pet\n")
        .assert()
        .success()
        .stdout(predicate::eq("ELIZA: I am fond of my pet.\n"));

    eliza_cmd()
        .args(["--seed", "1", "--quiet", "--reflect", "--script", path.to_str().unwrap()])
        .write_stdin("my pet\n")
        .assert()
        .success()
        .stdout(predicate::eq("ELIZA: you are fond of your pet.\n"));

    let _ = std::fs::remove_file(&path);
}

// ---------------------------------------------------------------------------
// Script loading
// ---------------------------------------------------------------------------

#[test]
fn bundled_script_loads() {
    eliza_cmd()
        .args([
            "--seed",
            "42",
            "--quiet",
            "--script",
            data_dir().join("eliza.json").to_str().unwrap(),
        ])
        .write_stdin("hello\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(FAREWELL));
}

#[test]
fn custom_quit_phrases() {
    let path = std::env::temp_dir().join("eliza_cli_test_custom_quit.json");
    std::fs::write(
        &path,
        r#"{"keywords": [], "fillers": ["Go on."], "quit_phrases": ["stop"], "farewell": "Later."}"#,
    )
    .unwrap();

    eliza_cmd()
        .args(["--quiet", "--script", path.to_str().unwrap()])
        .write_stdin("bye\nSTOP\n")
        .assert()
        .success()
        .stdout(predicate::eq("ELIZA: Go on.\nELIZA: Later.\n"));

    let _ = std::fs::remove_file(&path);
}

#[test]
fn missing_script_fails() {
    eliza_cmd()
        .args(["--script", "/nonexistent/path/eliza.json"])
        .write_stdin("hello\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("/nonexistent/path/eliza.json"));
}

#[test]
fn invalid_script_fails() {
    let path = std::env::temp_dir().join("eliza_cli_test_invalid.json");
    std::fs::write(&path, r#"{"keywords": [], "fillers": []}"#).unwrap();

    eliza_cmd()
        .args(["--script", path.to_str().unwrap()])
        .write_stdin("hello\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no filler responses"));

    let _ = std::fs::remove_file(&path);
}

// ---------------------------------------------------------------------------
// Deterministic output with --seed
// ---------------------------------------------------------------------------

#[test]
fn seed_produces_deterministic_output() {
    let run = || {
        eliza_cmd()
            .args(["--seed", "123"])
            .write_stdin("hello\nI feel odd\nwhatever\nmy dream\nquit\n")
            .output()
            .expect("should run")
    };

    let out1 = run();
    let out2 = run();

    assert_eq!(
        out1.stdout, out2.stdout,
        "same seed should produce identical stdout"
    );
}
