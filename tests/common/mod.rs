//! Shared helpers for linebisect integration tests.
//!
//! Every binary invocation runs inside its own temp directory so that no
//! stray `linebisect.toml` is picked up.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Fresh, empty working directory.
pub fn workdir() -> TempDir {
    TempDir::new().expect("failed to create temp dir")
}

/// Run linebisect with the given args in the given directory.
pub fn linebisect_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_linebisect"))
        .args(args)
        .current_dir(dir)
        .env_remove("LINEBISECT_SEED")
        .env_remove("LINEBISECT_LOG")
        .output()
        .expect("failed to execute linebisect")
}

/// Run linebisect and assert it succeeds. Returns stdout as string.
pub fn linebisect_ok(dir: &Path, args: &[&str]) -> String {
    let out = linebisect_in(dir, args);
    let stderr = String::from_utf8_lossy(&out.stderr);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        out.status.success(),
        "linebisect {} failed:\nstdout: {stdout}\nstderr: {stderr}",
        args.join(" "),
    );
    stdout.to_string()
}

/// Run linebisect and assert it fails with `expected` somewhere on stderr.
pub fn linebisect_fails_with(dir: &Path, args: &[&str], expected: &str) {
    let out = linebisect_in(dir, args);
    assert!(
        !out.status.success(),
        "Expected command to fail: linebisect {}",
        args.join(" ")
    );
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains(expected),
        "Expected error containing '{expected}', got: {stderr}"
    );
}
