use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use crate::model::{DatePair, Timestamp};
use crate::util::{git_exit_code, run_git};

pub fn show_toplevel(repo: &str) -> Result<String> {
    let out = run_git(repo, &["rev-parse".into(), "--show-toplevel".into()])?;
    Ok(out.trim().to_string())
}

/// Full object name of `rev`, or `None` when it does not resolve to a commit.
pub fn resolve_commit(repo: &str, rev: &str) -> Option<String> {
    let args: Vec<String> = vec!["rev-parse".into(), "--verify".into(), "-q".into(), format!("{}^{{commit}}", rev)];
    let out = run_git(repo, &args).ok()?;
    let sha = out.trim();
    if sha.is_empty() { None } else { Some(sha.to_string()) }
}

/// Author and commit dates of `rev` in strict ISO form.
pub fn commit_dates(repo: &str, rev: &str) -> Result<DatePair> {
    let args: Vec<String> = vec!["show".into(), "-s".into(), "--format=%aI %cI".into(), rev.into()];
    let out = run_git(repo, &args)?;
    match parse_dates_line(&out) {
        Some(pair) => Ok(pair),
        None => bail!("unexpected date output for {}: {:?}", rev, out.trim()),
    }
}

/// Parse `<author> <commit>` as printed by `--format=%aI %cI`.
pub fn parse_dates_line(out: &str) -> Option<DatePair> {
    let mut parts = out.trim().split_whitespace();
    let author = Timestamp::parse(parts.next()?).ok()?;
    let commit = Timestamp::parse(parts.next()?).ok()?;
    if parts.next().is_some() { return None; }
    Some(DatePair { author, commit })
}

/// Absolute path of a file or directory inside the git dir (worktree aware).
pub fn git_path(repo: &str, name: &str) -> Result<PathBuf> {
    let out = run_git(repo, &["rev-parse".into(), "--git-path".into(), name.into()])?;
    let p = PathBuf::from(out.trim());
    Ok(if p.is_absolute() { p } else { Path::new(repo).join(p) })
}

/// Whether the index differs from HEAD.
pub fn has_staged_changes(repo: &str) -> Result<bool> {
    let args: Vec<String> = vec!["diff".into(), "--cached".into(), "--quiet".into()];
    match git_exit_code(repo, &args)? {
        Some(0) => Ok(false),
        Some(1) => Ok(true),
        code => bail!("git diff --cached exited with {:?}", code),
    }
}
