//! test-support: git fixture repositories and a runner for the `git-commit-date` binary.
//!
//! Add as a dev-dependency in your top-level `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test_support = { path = "tests/support" }
//! ```
//!
//! Fixture dates always carry a non-UTC offset so git prints them back
//! verbatim with `%aI` instead of normalizing to `Z`.

use once_cell::sync::Lazy;
use tracing_subscriber::{fmt, EnvFilter};

use std::path::Path;
use std::process::{Command, Output};

pub const BIN: &str = "git-commit-date";
/// Frozen "now" handed to the binary through `--now-override`.
pub const NOW: &str = "2024-06-01T12:00:00+02:00";

pub const BASE_DATE: &str = "2024-01-01T10:00:00+02:00";
pub const MAIN_DATE: &str = "2024-02-01T09:00:00+02:00";
pub const TOPIC_AUTHOR_DATE: &str = "2023-07-01T12:00:00+02:00";
pub const TOPIC_COMMIT_DATE: &str = "2023-07-03T12:00:00+02:00";

/// Initialize `tracing` once, honoring `RUST_LOG` and writing via the test writer.
///
/// Safe to call from multiple tests; only the first call configures the global subscriber.
pub fn init_tracing() {
    static INIT: Lazy<()> = Lazy::new(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new("warn,test=info"))
            .unwrap();
        // with_test_writer() causes logs to appear alongside failing tests only (cargo/nextest)
        let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
    });
    Lazy::force(&INIT);
}

/// Run a binary target with `assert_cmd`, returning the ready-to-run `Command`.
pub fn cmd_bin(bin: &str) -> assert_cmd::Command {
    init_tracing();
    assert_cmd::Command::cargo_bin(bin).expect("binary target not found")
}

/// `git-commit-date` pointed at `repo`, with a frozen clock and no editor.
///
/// Date variables leaking in from the environment are removed so only the
/// binary decides what git sees.
pub fn commit_date_cmd(repo: &Path) -> assert_cmd::Command {
    let mut cmd = cmd_bin(BIN);
    cmd.current_dir(repo)
        .env("GIT_EDITOR", "true")
        .env_remove("GIT_AUTHOR_DATE")
        .env_remove("GIT_COMMITTER_DATE")
        .args(["--now-override", NOW, "--tz", "local"]);
    cmd
}

fn git(repo: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new("git");
    cmd.args(args)
        .current_dir(repo)
        .env("GIT_EDITOR", "true")
        .env_remove("GIT_AUTHOR_DATE")
        .env_remove("GIT_COMMITTER_DATE");
    cmd
}

/// Run git and require success.
pub fn run(repo: &Path, args: &[&str]) {
    let status = git(repo, args).status().unwrap();
    assert!(status.success(), "git {:?} failed", args);
}

/// Run git and return its raw output, whatever the exit status.
pub fn try_run(repo: &Path, args: &[&str]) -> Output {
    git(repo, args).output().unwrap()
}

/// Run git, require success, and return trimmed stdout.
pub fn output(repo: &Path, args: &[&str]) -> String {
    let out = try_run(repo, args);
    assert!(out.status.success(), "git {:?} failed: {}", args, String::from_utf8_lossy(&out.stderr));
    String::from_utf8_lossy(&out.stdout).trim().to_string()
}

/// `(author, committer)` dates of `rev` as strict ISO strings.
pub fn commit_dates(repo: &Path, rev: &str) -> (String, String) {
    let line = output(repo, &["show", "-s", "--format=%aI %cI", rev]);
    let mut parts = line.split_whitespace();
    let author = parts.next().expect("author date").to_string();
    let commit = parts.next().expect("commit date").to_string();
    (author, commit)
}

/// Write `content` to `file`, stage it and commit with fixed dates.
pub fn commit_file(repo: &Path, file: &str, content: &str, message: &str, author_date: &str, commit_date: &str) {
    std::fs::write(repo.join(file), content).unwrap();
    run(repo, &["add", file]);
    let status = git(repo, &["commit", "-q", "-m", message])
        .env("GIT_AUTHOR_DATE", author_date)
        .env("GIT_COMMITTER_DATE", commit_date)
        .status()
        .unwrap();
    assert!(status.success(), "commit {:?} failed", message);
}

/// Empty repository on `main` with a local identity and signing off.
pub fn init_repo() -> tempfile::TempDir {
    let dir = tempfile::TempDir::new().unwrap();
    run(dir.path(), &["init", "-q", "-b", "main"]);
    run(dir.path(), &["config", "user.name", "Fixture Bot"]);
    run(dir.path(), &["config", "user.email", "fixture@example.com"]);
    run(dir.path(), &["config", "commit.gpgsign", "false"]);
    dir
}

/// Repository with a single commit dated `BASE_DATE`.
pub fn init_fixture_repo() -> tempfile::TempDir {
    let dir = init_repo();
    commit_file(dir.path(), "file.txt", "base\n", "base", BASE_DATE, BASE_DATE);
    dir
}

/// `main` and `topic` diverge from a base commit, both touching `file.txt`.
///
/// Leaves `topic` checked out. The topic commit carries
/// `TOPIC_AUTHOR_DATE`/`TOPIC_COMMIT_DATE`; main's tip carries `MAIN_DATE`.
pub fn diverged_repo() -> tempfile::TempDir {
    let dir = init_fixture_repo();
    let repo = dir.path();
    run(repo, &["checkout", "-q", "-b", "topic"]);
    commit_file(repo, "file.txt", "topic\n", "topic change", TOPIC_AUTHOR_DATE, TOPIC_COMMIT_DATE);
    run(repo, &["checkout", "-q", "main"]);
    commit_file(repo, "file.txt", "main\n", "main change", MAIN_DATE, MAIN_DATE);
    run(repo, &["checkout", "-q", "topic"]);
    dir
}

/// Rebase `topic` onto `main` with `extra` options and stop on the conflict.
pub fn conflicted_rebase(extra: &[&str]) -> tempfile::TempDir {
    let dir = diverged_repo();
    let mut args = vec!["rebase"];
    args.extend_from_slice(extra);
    args.push("main");
    let out = try_run(dir.path(), &args);
    assert!(!out.status.success(), "rebase was expected to stop on a conflict");
    dir
}

/// Stop an interactive rebase on `edit` of the tip commit, which is replayed in place.
pub fn edit_stop_rebase() -> tempfile::TempDir {
    let dir = init_fixture_repo();
    let repo = dir.path();
    commit_file(repo, "other.txt", "edit me\n", "to edit", TOPIC_AUTHOR_DATE, TOPIC_COMMIT_DATE);
    let status = git(repo, &["rebase", "-q", "-i", "HEAD~1"])
        .env("GIT_SEQUENCE_EDITOR", "sed -i -e 's/^pick/edit/'")
        .status()
        .unwrap();
    assert!(status.success(), "interactive rebase did not stop cleanly");
    dir
}

/// Merge `topic` into `main` without committing, leaving MERGE_HEAD in place.
pub fn pending_merge() -> tempfile::TempDir {
    let dir = init_fixture_repo();
    let repo = dir.path();
    run(repo, &["checkout", "-q", "-b", "topic"]);
    commit_file(repo, "theirs.txt", "theirs\n", "their change", TOPIC_AUTHOR_DATE, TOPIC_COMMIT_DATE);
    run(repo, &["checkout", "-q", "main"]);
    commit_file(repo, "ours.txt", "ours\n", "our change", MAIN_DATE, MAIN_DATE);
    run(repo, &["merge", "-q", "--no-ff", "--no-commit", "topic"]);
    dir
}
