// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Utilities for paths, git subprocesses, logging setup and man page rendering
// role: utilities/helpers
// inputs: Various primitives; paths; git arguments and environment; clap CommandFactory
// outputs: Canonicalized paths, captured git stdout, exit codes, man page text
// side_effects: run_git* invoke subprocesses; init_logging installs the global subscriber
// invariants:
// - run_git surfaces the command and stderr on failure
// - run_git_passthrough inherits the terminal so git can open an editor
// errors: spawn failures and non-zero exits bubble with context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use clap::CommandFactory;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

pub fn canonicalize_lossy<P: AsRef<Path>>(p: P) -> String {
  let p = p.as_ref();
  let pb: PathBuf = match std::fs::canonicalize(p) {
    Ok(x) => x,
    Err(_) => match std::env::current_dir() {
      Ok(cwd) => cwd.join(p),
      Err(_) => PathBuf::from(p),
    },
  };
  pb.to_string_lossy().to_string()
}

pub fn run_git(repo: &str, args: &[String]) -> Result<String> {
  debug!(?args, "git");
  let out = Command::new("git")
    .args(args)
    .current_dir(repo)
    .output()
    .with_context(|| format!("spawning git {:?}", args))?;

  if out.status.success() {
    Ok(String::from_utf8_lossy(&out.stdout).to_string())
  } else {
    let stderr = String::from_utf8_lossy(&out.stderr);
    anyhow::bail!("git {:?} failed: {}", args, stderr.trim())
  }
}

/// Run git for its exit status only; output is discarded.
///
/// Returns `None` when the process was killed by a signal.
pub fn git_exit_code(repo: &str, args: &[String]) -> Result<Option<i32>> {
  debug!(?args, "git (status)");
  let out = Command::new("git")
    .args(args)
    .current_dir(repo)
    .output()
    .with_context(|| format!("spawning git {:?}", args))?;
  Ok(out.status.code())
}

/// Run git attached to the terminal with extra environment variables.
pub fn run_git_passthrough(repo: &str, args: &[String], envs: &[(String, String)]) -> Result<()> {
  debug!(?args, ?envs, "git (passthrough)");
  let status = Command::new("git")
    .args(args)
    .envs(envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    .current_dir(repo)
    .status()
    .with_context(|| format!("spawning git {:?}", args))?;

  if status.success() {
    Ok(())
  } else {
    anyhow::bail!("git {:?} failed ({})", args, status)
  }
}

/// Install the global tracing subscriber on stderr.
///
/// `RUST_LOG` wins when set; otherwise `verbosity` picks warn/info/debug.
pub fn init_logging(verbosity: u8) {
  let fallback = match verbosity {
    0 => "warn",
    1 => "info",
    _ => "debug",
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
  let _ = fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .try_init();
}

/// Quote one argument for display in a POSIX shell line.
pub fn shell_quote(arg: &str) -> String {
  let plain = !arg.is_empty()
    && arg
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || "-_=./:+@%,".contains(c));
  if plain {
    arg.to_string()
  } else {
    format!("'{}'", arg.replace('\'', r"'\''"))
  }
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
