// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the data model shared by state resolution, presets, field rules, the form and submission
// role: model/types
// outputs: Timestamp, DatePair, RepoSnapshot (+ nested rebase/merge state), Preset, CommitRequest, SessionOutcome
// invariants:
// - Timestamp is always canonical: YYYY-MM-DDTHH:MM:SS±HH:MM; equality is string equality
// - rebase/merge state can only exist under a HEAD; every optional group is gated by construction
// errors: TimestampError for malformed or out-of-range input
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt;

use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::Clock;

const CANONICAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

static INPUT_RE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(
    r"^(?P<date>\d{4}-\d{2}-\d{2})[Tt ](?P<hm>\d{2}:\d{2})(?P<secs>:\d{2})?\s*(?P<offset>[Zz]|[+-]\d{2}:?\d{2})?$",
  )
  .expect("static regex")
});

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TimestampError {
  #[error("invalid date {0:?}: expected YYYY-MM-DD HH:MM[:SS] with an optional +HH:MM offset")]
  Malformed(String),
  #[error("invalid date {raw:?}: {reason}")]
  Invalid { raw: String, reason: String },
}

/// An ISO-8601 date-time with an explicit offset, kept in canonical string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timestamp(String);

impl Timestamp {
  /// Parse a strict RFC 3339 value such as git's `%aI` output.
  ///
  /// A `Z` suffix becomes `+00:00` and fractional seconds are dropped.
  pub fn parse(raw: &str) -> Result<Self, TimestampError> {
    let raw = raw.trim();
    let dt = DateTime::parse_from_rfc3339(raw).map_err(|e| TimestampError::Invalid {
      raw: raw.to_string(),
      reason: e.to_string(),
    })?;
    Ok(Self::from_datetime(&dt))
  }

  /// Parse what a person types into a date field.
  ///
  /// Seconds default to `:00`; a missing offset falls back to `fallback`.
  /// Instants before the Unix epoch are rejected.
  pub fn parse_input(raw: &str, fallback: FixedOffset) -> Result<Self, TimestampError> {
    let trimmed = raw.trim();
    let caps = INPUT_RE
      .captures(trimmed)
      .ok_or_else(|| TimestampError::Malformed(trimmed.to_string()))?;

    let secs = caps.name("secs").map(|m| m.as_str()).unwrap_or(":00");
    let offset = match caps.name("offset").map(|m| m.as_str()) {
      None => format_offset(fallback),
      Some("Z") | Some("z") => "+00:00".to_string(),
      Some(o) if o.len() == 5 => format!("{}:{}", &o[..3], &o[3..]),
      Some(o) => o.to_string(),
    };

    let parsed = Self::parse(&format!("{}T{}{}{}", &caps["date"], &caps["hm"], secs, offset))?;
    if parsed.to_datetime().is_some_and(|dt| dt.timestamp() < 0) {
      return Err(TimestampError::Invalid {
        raw: trimmed.to_string(),
        reason: "git cannot record dates before 1970-01-01T00:00:00+00:00".into(),
      });
    }
    Ok(parsed)
  }

  pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self
  where
    Tz::Offset: fmt::Display,
  {
    Self(dt.format(CANONICAL_FORMAT).to_string())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub fn to_datetime(&self) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(&self.0).ok()
  }

  /// The zone offset carried by this timestamp.
  pub fn offset(&self) -> FixedOffset {
    self
      .to_datetime()
      .map(|dt| *dt.offset())
      .unwrap_or_else(|| Utc.fix())
  }
}

fn format_offset(offset: FixedOffset) -> String {
  let secs = offset.local_minus_utc();
  let sign = if secs < 0 { '-' } else { '+' };
  let abs = secs.abs();
  format!("{}{:02}:{:02}", sign, abs / 3600, (abs % 3600) / 60)
}

impl fmt::Display for Timestamp {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl TryFrom<String> for Timestamp {
  type Error = TimestampError;

  fn try_from(value: String) -> Result<Self, Self::Error> {
    Timestamp::parse(&value)
  }
}

impl From<Timestamp> for String {
  fn from(value: Timestamp) -> Self {
    value.0
  }
}

/// Author and commit timestamps of one commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatePair {
  pub author: Timestamp,
  pub commit: Timestamp,
}

impl DatePair {
  /// Both dates are the same string, so one preset can stand for both.
  pub fn is_uniform(&self) -> bool {
    self.author == self.commit
  }
}

/// Flags read from git's rebase state directory for the commit being replayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebaseFlags {
  /// `ignore_date` marker: the author date is reset to the current time.
  pub author_date_is_now: bool,
  /// `cdate_is_adate` marker: the committer date copies the author date.
  pub commit_date_is_author_date: bool,
  pub rebase_head_is_head: bool,
  pub has_staged_changes: bool,
  /// `amend` marker: the rebase stopped on an `edit` and HEAD may be amended.
  pub amend_pending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebaseState {
  pub dates: DatePair,
  pub flags: RebaseFlags,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeState {
  pub dates: DatePair,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadState {
  pub dates: DatePair,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub rebase: Option<RebaseState>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub merge: Option<MergeState>,
}

/// Facts about the repository when the interaction starts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSnapshot {
  pub head: Option<HeadState>,
}

impl RepoSnapshot {
  pub fn unborn() -> Self {
    Self { head: None }
  }

  pub fn with_head(dates: DatePair) -> Self {
    Self {
      head: Some(HeadState { dates, rebase: None, merge: None }),
    }
  }

  pub fn has_head(&self) -> bool {
    self.head.is_some()
  }

  pub fn is_rebase(&self) -> bool {
    self.rebase().is_some()
  }

  pub fn is_merge(&self) -> bool {
    self.merge_head_dates().is_some()
  }

  pub fn head_dates(&self) -> Option<&DatePair> {
    self.head.as_ref().map(|h| &h.dates)
  }

  pub fn rebase(&self) -> Option<&RebaseState> {
    self.head.as_ref().and_then(|h| h.rebase.as_ref())
  }

  pub fn merge_head_dates(&self) -> Option<&DatePair> {
    self.head.as_ref().and_then(|h| h.merge.as_ref()).map(|m| &m.dates)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
  Author,
  Commit,
}

impl FieldId {
  pub fn label(self) -> &'static str {
    match self {
      FieldId::Author => "Author Date",
      FieldId::Commit => "Commit Date",
    }
  }
}

impl fmt::Display for FieldId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      FieldId::Author => f.write_str("author date"),
      FieldId::Commit => f.write_str("commit date"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetValue {
  /// Wall-clock time at the moment the preset is picked.
  Now,
  Fixed(Timestamp),
}

impl PresetValue {
  pub fn resolve(&self, clock: &Clock) -> Timestamp {
    match self {
      PresetValue::Now => clock.now(),
      PresetValue::Fixed(ts) => ts.clone(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
  pub label: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub tooltip: Option<String>,
  pub value: PresetValue,
}

/// The user's final choice, consumed by submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRequest {
  pub author_date: Timestamp,
  pub commit_date: Timestamp,
  pub amend: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
  Submitted(CommitRequest),
  /// Closed without submitting; nothing is handed to git.
  Cancelled,
}
