// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Live view model of the commit form: two date fields, the commit->author link, amend toggle, presets
// role: view-model
// inputs: RepoSnapshot, Clock, user edits (preset picks, typed dates, toggles), refresh ticks
// outputs: CommitRequest on submit; FormReport for --print-state
// invariants:
// - while the link is checked the commit field equals the author field after every mutation
// - read-only fields reject edits with FormError; hard locks (tracking now, forced link) cannot be released
// - "Now" defaults are taken once per session; Now presets and ticks read the clock each time
// errors: FormError for rejected edits
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::clock::Clock;
use crate::model::{CommitRequest, FieldId, Preset, PresetValue, RepoSnapshot, Timestamp, TimestampError};
use crate::presets::derive_presets;
use crate::rules::{resolve_forced_values, FieldRule, FieldRules};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
  #[error("the {field} is read-only: {reason}")]
  ReadOnly { field: FieldId, reason: String },
  #[error("the {field} cannot be released: {reason}")]
  Locked { field: FieldId, reason: String },
  #[error("the commit date must match the author date: {0}")]
  LinkForced(String),
  #[error("no preset number {0}")]
  UnknownPreset(usize),
  #[error("amend is not available here")]
  AmendUnavailable,
  #[error(transparent)]
  Timestamp(#[from] TimestampError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Lock {
  Open,
  /// Read-only until released.
  Forced { reason: String },
  /// Follows the clock; never released.
  TracksNow { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateField {
  pub value: Timestamp,
  pub lock: Lock,
}

/// The commit field's "use author date" checkbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
  pub checked: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub forced_reason: Option<String>,
}

pub struct CommitForm {
  snapshot: RepoSnapshot,
  clock: Clock,
  session_now: Timestamp,
  amend: bool,
  rules: FieldRules,
  presets: Vec<Preset>,
  author: DateField,
  commit: DateField,
  link: Link,
}

impl CommitForm {
  pub fn new(snapshot: RepoSnapshot, clock: Clock) -> Self {
    let session_now = clock.now();
    let rules = resolve_forced_values(&snapshot, false);
    let presets = derive_presets(&snapshot, false);
    let placeholder = DateField { value: session_now.clone(), lock: Lock::Open };
    let mut form = Self {
      snapshot,
      clock,
      session_now,
      amend: false,
      rules,
      presets,
      author: placeholder.clone(),
      commit: placeholder,
      link: Link { checked: true, forced_reason: None },
    };
    form.apply_rules();
    form
  }

  fn seed(&self, rule: &FieldRule) -> DateField {
    match rule {
      FieldRule::Free { default } => DateField {
        value: match default {
          PresetValue::Now => self.session_now.clone(),
          PresetValue::Fixed(ts) => ts.clone(),
        },
        lock: Lock::Open,
      },
      FieldRule::Forced { value, reason } => DateField {
        value: value.clone(),
        lock: Lock::Forced { reason: reason.clone() },
      },
      FieldRule::TracksNow { reason } => DateField {
        value: self.session_now.clone(),
        lock: Lock::TracksNow { reason: reason.clone() },
      },
      FieldRule::Alternative { .. } => DateField {
        value: self.session_now.clone(),
        lock: Lock::Open,
      },
    }
  }

  fn apply_rules(&mut self) {
    self.author = self.seed(self.rules.rule(FieldId::Author));
    self.commit = self.seed(self.rules.rule(FieldId::Commit));
    self.link = match &self.rules.commit {
      FieldRule::Alternative { reason, .. } => Link { checked: true, forced_reason: Some(reason.clone()) },
      _ => Link { checked: self.commit.value == self.author.value, forced_reason: None },
    };
    self.sync_link();
  }

  fn sync_link(&mut self) {
    if self.link.checked {
      self.commit.value = self.author.value.clone();
    }
  }

  pub fn snapshot(&self) -> &RepoSnapshot {
    &self.snapshot
  }

  pub fn rules(&self) -> &FieldRules {
    &self.rules
  }

  pub fn presets(&self) -> &[Preset] {
    &self.presets
  }

  pub fn field(&self, id: FieldId) -> &DateField {
    match id {
      FieldId::Author => &self.author,
      FieldId::Commit => &self.commit,
    }
  }

  fn field_mut(&mut self, id: FieldId) -> &mut DateField {
    match id {
      FieldId::Author => &mut self.author,
      FieldId::Commit => &mut self.commit,
    }
  }

  pub fn link(&self) -> &Link {
    &self.link
  }

  pub fn amend(&self) -> bool {
    self.amend
  }

  /// Why `id` cannot be edited right now, if it cannot.
  pub fn read_only_reason(&self, id: FieldId) -> Option<String> {
    if id == FieldId::Commit && self.link.checked {
      return Some(
        self
          .link
          .forced_reason
          .clone()
          .unwrap_or_else(|| format!("it uses the {}", FieldId::Author)),
      );
    }
    match &self.field(id).lock {
      Lock::Open => None,
      Lock::Forced { reason } | Lock::TracksNow { reason } => Some(reason.clone()),
    }
  }

  pub fn is_editable(&self, id: FieldId) -> bool {
    self.read_only_reason(id).is_none()
  }

  fn ensure_editable(&self, id: FieldId) -> Result<(), FormError> {
    match self.read_only_reason(id) {
      None => Ok(()),
      Some(reason) => Err(FormError::ReadOnly { field: id, reason }),
    }
  }

  fn store(&mut self, id: FieldId, value: Timestamp) {
    debug!(field = %id, %value, "set");
    self.field_mut(id).value = value;
    self.sync_link();
  }

  /// Toggle amend; presets and rules are re-derived and both fields re-seeded.
  pub fn set_amend(&mut self, amend: bool) -> Result<(), FormError> {
    if !self.rules.amend_available {
      return Err(FormError::AmendUnavailable);
    }
    if amend == self.amend {
      return Ok(());
    }
    self.amend = amend;
    self.rules = resolve_forced_values(&self.snapshot, amend);
    self.presets = derive_presets(&self.snapshot, amend);
    self.apply_rules();
    Ok(())
  }

  pub fn apply_preset(&mut self, id: FieldId, index: usize) -> Result<(), FormError> {
    self.ensure_editable(id)?;
    let value = self
      .presets
      .get(index)
      .ok_or(FormError::UnknownPreset(index + 1))?
      .value
      .resolve(&self.clock);
    self.store(id, value);
    Ok(())
  }

  /// Parse typed input; a missing offset keeps the field's current one.
  pub fn set_text(&mut self, id: FieldId, raw: &str) -> Result<(), FormError> {
    self.ensure_editable(id)?;
    let value = Timestamp::parse_input(raw, self.field(id).value.offset())?;
    self.store(id, value);
    Ok(())
  }

  /// Check or uncheck "use author date" on the commit field.
  ///
  /// Unchecking leaves the last mirrored value in place.
  pub fn toggle_link(&mut self) -> Result<(), FormError> {
    if let Some(reason) = &self.link.forced_reason {
      return Err(FormError::LinkForced(reason.clone()));
    }
    self.link.checked = !self.link.checked;
    self.sync_link();
    Ok(())
  }

  /// Drop a forced value so the field becomes editable.
  pub fn release(&mut self, id: FieldId) -> Result<(), FormError> {
    let field = self.field_mut(id);
    if let Lock::TracksNow { reason } = &field.lock {
      return Err(FormError::Locked { field: id, reason: reason.clone() });
    }
    field.lock = Lock::Open;
    Ok(())
  }

  /// Set a value from outside the interactive flow (command-line flags).
  ///
  /// Forced values and an optional link are released; hard locks are errors.
  pub fn override_value(&mut self, id: FieldId, value: Timestamp) -> Result<(), FormError> {
    if id == FieldId::Commit && self.link.checked {
      if let Some(reason) = &self.link.forced_reason {
        return Err(FormError::LinkForced(reason.clone()));
      }
      self.link.checked = false;
    }
    self.release(id)?;
    self.store(id, value);
    Ok(())
  }

  /// Refresh fields that follow the clock. Returns whether anything changed.
  pub fn tick(&mut self) -> bool {
    let mut changed = false;
    for id in [FieldId::Author, FieldId::Commit] {
      if matches!(self.field(id).lock, Lock::TracksNow { .. }) {
        let now = self.clock.now();
        if self.field(id).value != now {
          self.field_mut(id).value = now;
          changed = true;
        }
      }
    }
    if changed {
      self.sync_link();
    }
    changed
  }

  pub fn submit(&self) -> CommitRequest {
    CommitRequest {
      author_date: self.author.value.clone(),
      commit_date: self.commit.value.clone(),
      amend: self.amend,
    }
  }

  pub fn report(&self) -> FormReport<'_> {
    FormReport {
      snapshot: &self.snapshot,
      amend: self.amend,
      presets: &self.presets,
      rules: &self.rules,
      author: &self.author,
      commit: &self.commit,
      link: &self.link,
    }
  }
}

/// Everything the form knows, as printed by `--print-state`.
#[derive(Debug, Serialize)]
pub struct FormReport<'a> {
  pub snapshot: &'a RepoSnapshot,
  pub amend: bool,
  pub presets: &'a [Preset],
  pub rules: &'a FieldRules,
  pub author: &'a DateField,
  pub commit: &'a DateField,
  pub link: &'a Link,
}
