// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Decide, per date field, whether it is free, forced to a value, tracking now, or mirroring the other field
// role: decision table
// inputs: RepoSnapshot, amend intent
// outputs: FieldRules (author rule, commit rule, amend availability, submit action, notice)
// invariants:
// - no HEAD: nothing forced, amend unavailable
// - rebase: amend unavailable; cdate_is_adate always makes commit mirror author
// - pure: same input, same output
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::Serialize;

use crate::model::{FieldId, PresetValue, RepoSnapshot, Timestamp};

pub const REBASE_NOTICE: &str =
  "NOTE: Commit date will be updated for all modified commits, even those that are not manually edited.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldRule {
  /// Editable; starts at `default`.
  Free { default: PresetValue },
  /// Starts at `value` and stays read-only until released.
  Forced { value: Timestamp, reason: String },
  /// Follows the wall clock for as long as the session is open.
  TracksNow { reason: String },
  /// Mirrors `source`; the link cannot be unchecked.
  Alternative { source: FieldId, reason: String },
}

impl FieldRule {
  fn free_now() -> Self {
    FieldRule::Free { default: PresetValue::Now }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitAction {
  Commit,
  Amend,
  Continue,
}

impl SubmitAction {
  pub fn caption(self) -> &'static str {
    match self {
      SubmitAction::Commit => "Commit",
      SubmitAction::Amend => "Amend",
      SubmitAction::Continue => "Continue",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRules {
  pub author: FieldRule,
  pub commit: FieldRule,
  pub amend_available: bool,
  pub action: SubmitAction,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub notice: Option<String>,
}

impl FieldRules {
  pub fn rule(&self, field: FieldId) -> &FieldRule {
    match field {
      FieldId::Author => &self.author,
      FieldId::Commit => &self.commit,
    }
  }
}

pub fn resolve_forced_values(snapshot: &RepoSnapshot, amend_intent: bool) -> FieldRules {
  let Some(head) = snapshot.head_dates() else {
    return FieldRules {
      author: FieldRule::free_now(),
      commit: FieldRule::free_now(),
      amend_available: false,
      action: SubmitAction::Commit,
      notice: None,
    };
  };

  let Some(rebase) = snapshot.rebase() else {
    let (author, action) = if amend_intent {
      (
        FieldRule::Forced {
          value: head.author.clone(),
          reason: "amending keeps the author date of HEAD".into(),
        },
        SubmitAction::Amend,
      )
    } else {
      (FieldRule::free_now(), SubmitAction::Commit)
    };
    return FieldRules {
      author,
      commit: FieldRule::free_now(),
      amend_available: true,
      action,
      notice: None,
    };
  };

  let flags = rebase.flags;
  let author = if flags.author_date_is_now {
    FieldRule::TracksNow {
      reason: "the rebase resets author dates to the current time".into(),
    }
  } else {
    FieldRule::Forced {
      value: rebase.dates.author.clone(),
      reason: "the rebase keeps the author date of the replayed commit".into(),
    }
  };

  let commit = if flags.commit_date_is_author_date {
    FieldRule::Alternative {
      source: FieldId::Author,
      reason: "the rebase uses --committer-date-is-author-date".into(),
    }
  } else if !flags.has_staged_changes {
    FieldRule::Free { default: PresetValue::Fixed(rebase.dates.commit.clone()) }
  } else {
    FieldRule::free_now()
  };

  FieldRules {
    author,
    commit,
    amend_available: false,
    action: SubmitAction::Continue,
    notice: Some(REBASE_NOTICE.into()),
  }
}
