// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Capture a RepoSnapshot (HEAD, rebase, merge state and rebase flags) through a probe trait
// role: state resolution
// inputs: RepoProbe implementation (GitProbe over the git executable in production)
// outputs: RepoSnapshot
// side_effects: GitProbe runs read-only git commands and checks marker files
// invariants:
// - a query that yields nothing leaves the dependent group absent; nothing is fabricated
// - unreadable marker files read as false
// - rebase and merge state only exist when HEAD resolved with dates
// errors: none surface from capture; GitProbe::open fails outside a repository
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::gitio;
use crate::model::{DatePair, HeadState, MergeState, RebaseFlags, RebaseState, RepoSnapshot};

/// Marker files git leaves in `rebase-merge/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebaseMarker {
  IgnoreDate,
  CommitDateIsAuthorDate,
  Amend,
}

impl RebaseMarker {
  pub fn file_name(self) -> &'static str {
    match self {
      RebaseMarker::IgnoreDate => "ignore_date",
      RebaseMarker::CommitDateIsAuthorDate => "cdate_is_adate",
      RebaseMarker::Amend => "amend",
    }
  }
}

/// Read-only questions asked about a repository.
pub trait RepoProbe {
  fn head(&self) -> Option<String>;
  /// Commit being replayed by an in-progress rebase.
  fn rebase_head(&self) -> Option<String>;
  fn dates(&self, rev: &str) -> Option<DatePair>;
  fn rebase_marker(&self, marker: RebaseMarker) -> bool;
  fn has_staged_changes(&self) -> bool;
}

pub fn capture(probe: &dyn RepoProbe) -> RepoSnapshot {
  let Some(head) = probe.head() else {
    debug!("no HEAD commit");
    return RepoSnapshot::unborn();
  };
  let Some(head_dates) = probe.dates(&head) else {
    warn!(%head, "HEAD resolved but its dates could not be read");
    return RepoSnapshot::unborn();
  };

  let rebase = probe.rebase_head().and_then(|rebase_head| {
    let dates = probe.dates(&rebase_head)?;
    let flags = RebaseFlags {
      author_date_is_now: probe.rebase_marker(RebaseMarker::IgnoreDate),
      commit_date_is_author_date: probe.rebase_marker(RebaseMarker::CommitDateIsAuthorDate),
      rebase_head_is_head: rebase_head == head,
      has_staged_changes: probe.has_staged_changes(),
      amend_pending: probe.rebase_marker(RebaseMarker::Amend),
    };
    debug!(%rebase_head, ?flags, "rebase in progress");
    Some(RebaseState { dates, flags })
  });

  let merge = probe.dates("MERGE_HEAD").map(|dates| MergeState { dates });
  if merge.is_some() {
    debug!("merge in progress");
  }

  RepoSnapshot {
    head: Some(HeadState { dates: head_dates, rebase, merge }),
  }
}

/// `RepoProbe` backed by the git executable.
pub struct GitProbe {
  repo: String,
  rebase_dir: PathBuf,
  apply_dir: PathBuf,
}

impl GitProbe {
  pub fn open(repo: &str) -> Result<Self> {
    let root = gitio::show_toplevel(repo).context("Could not find git repository.")?;
    let rebase_dir = gitio::git_path(&root, "rebase-merge")?;
    let apply_dir = gitio::git_path(&root, "rebase-apply")?;
    Ok(Self { repo: root, rebase_dir, apply_dir })
  }

  pub fn root(&self) -> &str {
    &self.repo
  }

  pub fn rebase_dir(&self) -> &Path {
    &self.rebase_dir
  }
}

impl RepoProbe for GitProbe {
  fn head(&self) -> Option<String> {
    gitio::resolve_commit(&self.repo, "HEAD")
  }

  fn rebase_head(&self) -> Option<String> {
    if !self.rebase_dir.is_dir() && !self.apply_dir.is_dir() {
      return None;
    }
    gitio::resolve_commit(&self.repo, "REBASE_HEAD")
  }

  fn dates(&self, rev: &str) -> Option<DatePair> {
    match gitio::commit_dates(&self.repo, rev) {
      Ok(pair) => Some(pair),
      Err(e) => {
        debug!(rev, error = %e, "no dates");
        None
      }
    }
  }

  fn rebase_marker(&self, marker: RebaseMarker) -> bool {
    std::fs::metadata(self.rebase_dir.join(marker.file_name())).is_ok()
  }

  fn has_staged_changes(&self) -> bool {
    gitio::has_staged_changes(&self.repo).unwrap_or_else(|e| {
      warn!(error = %e, "could not check the index; assuming staged changes");
      true
    })
  }
}
