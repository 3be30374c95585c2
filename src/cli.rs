use anyhow::{Context, Result, bail};
use chrono::{DateTime, FixedOffset};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::batch::Seeds;
use crate::clock::{Clock, Zone};
use crate::model::Timestamp;
use crate::util;

#[derive(Parser, Debug)]
#[command(
    name = "git-commit-date",
    version,
    about = "Pick author and commit dates, then commit, amend or continue a rebase",
    long_about = None
)]
pub struct Cli {
  /// Path inside the Git repository (default: current dir)
  #[arg(long, default_value = ".")]
  pub repo: PathBuf,

  /// Start with "amend" checked: rewrite HEAD instead of creating a new commit
  #[arg(long)]
  pub amend: bool,

  /// Author date, e.g. "2024-01-31 18:00" or 2024-01-31T18:00:00+01:00 (missing offset = local)
  #[arg(long)]
  pub author_date: Option<String>,

  /// Commit date; when given, the commit date no longer follows the author date
  #[arg(long)]
  pub commit_date: Option<String>,

  /// Submit right away with the defaults and any dates given on the command line
  #[arg(long, short = 'y')]
  pub yes: bool,

  /// Print repository state, presets, field rules and current values as JSON, then exit
  #[arg(long, conflicts_with_all = ["yes", "dry_run"])]
  pub print_state: bool,

  /// Print the git commands that would run instead of running them
  #[arg(long)]
  pub dry_run: bool,

  /// Zone for "now": local, utc or an IANA name such as Europe/Berlin
  #[arg(long, default_value = "local")]
  pub tz: String,

  /// Refresh interval in milliseconds for dates that follow the clock
  #[arg(long, default_value_t = 500)]
  pub tick_ms: u64,

  /// Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  /// Freeze "now" at this RFC 3339 instant (hidden; tests only)
  #[arg(long = "now-override", hide = true)]
  pub now_override: Option<String>,

  /// Extra arguments for `git commit`, after `--` (e.g. -- -m "message")
  #[arg(last = true)]
  pub git_args: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  Interactive,
  Batch,
  PrintState,
}

#[derive(Debug, Clone)]
pub struct EffectiveConfig {
  pub repo: String, // absolute path for stability
  pub mode: Mode,
  pub dry_run: bool,
  pub seeds: Seeds,
  pub clock: Clock,
  pub tick: Duration,
  pub git_args: Vec<String>,
}

fn parse_now_override(raw: &str) -> Result<DateTime<FixedOffset>> {
  DateTime::parse_from_rfc3339(raw.trim()).with_context(|| format!("--now-override: not an RFC 3339 instant: {raw:?}"))
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  let zone = cli.tz.parse::<Zone>().map_err(|e: String| anyhow::anyhow!("--tz: {e}"))?;
  let clock = match cli.now_override.as_deref() {
    Some(raw) => Clock::frozen(parse_now_override(raw)?, zone),
    None => Clock::new(zone),
  };

  if cli.tick_ms == 0 {
    bail!("--tick-ms must be greater than zero");
  }

  // Typed dates without an offset take the offset "now" has in the chosen zone.
  let fallback = clock.now().offset();
  let parse = |flag: &str, raw: &Option<String>| -> Result<Option<Timestamp>> {
    raw
      .as_deref()
      .map(|r| Timestamp::parse_input(r, fallback).with_context(|| format!("{flag}: {r:?}")))
      .transpose()
  };
  let author_date = parse("--author-date", &cli.author_date)?;
  let commit_date = parse("--commit-date", &cli.commit_date)?;

  let mode = if cli.print_state {
    Mode::PrintState
  } else if cli.yes {
    Mode::Batch
  } else {
    Mode::Interactive
  };

  Ok(EffectiveConfig {
    repo: util::canonicalize_lossy(&cli.repo),
    mode,
    dry_run: cli.dry_run,
    seeds: Seeds { amend: cli.amend, author_date, commit_date },
    clock,
    tick: Duration::from_millis(cli.tick_ms),
    git_args: cli.git_args,
  })
}
