// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Turn a CommitRequest into an ordered plan of git invocations and run (or print) it
// role: submission/orchestrator
// inputs: RepoSnapshot, CommitRequest, extra `git commit` arguments
// outputs: Plan (env + steps); side effects on the repository when executed
// side_effects: Runs git attached to the terminal; rewrites rebase-merge/author-script during a rebase
// invariants:
// - every git step runs with GIT_AUTHOR_DATE and GIT_COMMITTER_DATE from the request
// - rebase plans always end with `git rebase --continue`
// - author-script rewriting is best effort and never aborts the plan
// errors: the first failing git step aborts with context; no retries
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use tracing::{debug, info, warn};

use crate::model::{CommitRequest, RepoSnapshot, Timestamp};
use crate::util::{run_git_passthrough, shell_quote};

pub const AUTHOR_DATE_ENV: &str = "GIT_AUTHOR_DATE";
pub const COMMITTER_DATE_ENV: &str = "GIT_COMMITTER_DATE";

static AUTHOR_DATE_LINE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"(?m)^GIT_AUTHOR_DATE=.*$").expect("static regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
  Git(Vec<String>),
  /// Replace the author date git will use for the replayed commit.
  RewriteAuthorScript(Timestamp),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
  pub env: Vec<(String, String)>,
  pub steps: Vec<Step>,
}

fn args(list: &[&str]) -> Vec<String> {
  list.iter().map(|s| s.to_string()).collect()
}

pub fn plan(snapshot: &RepoSnapshot, request: &CommitRequest, extra: &[String]) -> Plan {
  let env = vec![
    (AUTHOR_DATE_ENV.to_string(), request.author_date.to_string()),
    (COMMITTER_DATE_ENV.to_string(), request.commit_date.to_string()),
  ];
  let date_arg = format!("--date={}", request.author_date);
  let mut steps = Vec::new();

  if let Some(rebase) = snapshot.rebase() {
    if !extra.is_empty() {
      warn!(?extra, "extra git commit arguments are ignored while continuing a rebase");
    }
    if rebase.flags.amend_pending {
      let mut amend = args(&["commit", "--only", "--no-edit", "--amend"]);
      amend.push(date_arg);
      steps.push(Step::Git(amend));
    }
    steps.push(Step::RewriteAuthorScript(request.author_date.clone()));
    steps.push(Step::Git(args(&["rebase", "--continue"])));
  } else if request.amend {
    let mut amend = args(&["commit", "--amend"]);
    amend.push(date_arg);
    amend.extend(extra.iter().cloned());
    steps.push(Step::Git(amend));
  } else {
    let mut commit = args(&["commit"]);
    commit.extend(extra.iter().cloned());
    steps.push(Step::Git(commit));
  }

  Plan { env, steps }
}

/// Swap the `GIT_AUTHOR_DATE=` line; `None` when the script has no such line.
pub fn rewrite_author_script(script: &str, date: &Timestamp) -> Option<String> {
  if !AUTHOR_DATE_LINE.is_match(script) {
    return None;
  }
  let line = format!("GIT_AUTHOR_DATE='{}'", date);
  Some(AUTHOR_DATE_LINE.replace(script, NoExpand(&line)).into_owned())
}

fn rewrite_author_script_file(path: &Path, date: &Timestamp) -> Result<()> {
  let script = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
  match rewrite_author_script(&script, date) {
    Some(updated) => {
      std::fs::write(path, updated).with_context(|| format!("writing {}", path.display()))?;
      debug!(path = %path.display(), %date, "author-script updated");
    }
    None => debug!(path = %path.display(), "author-script has no author date line"),
  }
  Ok(())
}

pub fn execute(repo: &str, rebase_dir: &Path, plan: &Plan) -> Result<()> {
  for step in &plan.steps {
    match step {
      Step::Git(args) => {
        info!(?args, "running git");
        run_git_passthrough(repo, args, &plan.env)?;
      }
      Step::RewriteAuthorScript(date) => {
        if let Err(e) = rewrite_author_script_file(&rebase_dir.join("author-script"), date) {
          warn!(error = %format!("{e:#}"), "could not update the rebase author date");
        }
      }
    }
  }
  Ok(())
}

impl fmt::Display for Plan {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let env: Vec<String> = self
      .env
      .iter()
      .map(|(k, v)| shell_quote(&format!("{k}={v}")))
      .collect();
    for step in &self.steps {
      match step {
        Step::Git(args) => {
          let quoted: Vec<String> = args.iter().map(|a| shell_quote(a)).collect();
          writeln!(f, "{} git {}", env.join(" "), quoted.join(" "))?;
        }
        Step::RewriteAuthorScript(date) => {
          writeln!(f, "# set GIT_AUTHOR_DATE='{date}' in rebase-merge/author-script")?;
        }
      }
    }
    Ok(())
  }
}
