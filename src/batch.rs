use anyhow::{Context, Result};

use crate::form::CommitForm;
use crate::model::{FieldId, SessionOutcome, Timestamp};

/// Values supplied on the command line, applied before any session starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Seeds {
  pub amend: bool,
  pub author_date: Option<Timestamp>,
  pub commit_date: Option<Timestamp>,
}

pub fn apply_seeds(form: &mut CommitForm, seeds: &Seeds) -> Result<()> {
  if seeds.amend {
    form.set_amend(true).context("--amend")?;
  }
  if let Some(date) = &seeds.author_date {
    form.override_value(FieldId::Author, date.clone()).context("--author-date")?;
  }
  if let Some(date) = &seeds.commit_date {
    form.override_value(FieldId::Commit, date.clone()).context("--commit-date")?;
  }
  Ok(())
}

/// Submit the form as it stands; the non-interactive session never cancels.
pub fn run(form: &CommitForm) -> SessionOutcome {
  SessionOutcome::Submitted(form.submit())
}
