use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::form::{CommitForm, FormError};
use crate::model::{FieldId, SessionOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
  Amend,
  Author,
  Commit,
  Submit,
}

impl Focus {
  pub fn field(self) -> Option<FieldId> {
    match self {
      Focus::Author => Some(FieldId::Author),
      Focus::Commit => Some(FieldId::Commit),
      Focus::Amend | Focus::Submit => None,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
  Info(String),
  Error(String),
}

pub struct App {
  pub form: CommitForm,
  pub focus: Focus,
  /// Text being typed into the focused field.
  pub editing: Option<String>,
  pub status: Option<Status>,
  pub outcome: Option<SessionOutcome>,
}

impl App {
  pub fn new(form: CommitForm) -> Self {
    Self { form, focus: Focus::Author, editing: None, status: None, outcome: None }
  }

  fn focus_order(&self) -> Vec<Focus> {
    let mut order = Vec::with_capacity(4);
    if self.form.rules().amend_available {
      order.push(Focus::Amend);
    }
    order.extend([Focus::Author, Focus::Commit, Focus::Submit]);
    order
  }

  fn move_focus(&mut self, forward: bool) {
    let order = self.focus_order();
    let pos = order.iter().position(|f| *f == self.focus).unwrap_or(0);
    let len = order.len();
    let next = if forward { (pos + 1) % len } else { (pos + len - 1) % len };
    self.focus = order[next];
  }

  fn report(&mut self, result: Result<(), FormError>, ok: Option<&str>) {
    self.status = match result {
      Ok(()) => ok.map(|m| Status::Info(m.to_string())),
      Err(e) => Some(Status::Error(e.to_string())),
    };
  }

  pub fn on_tick(&mut self) -> bool {
    self.form.tick()
  }

  pub fn handle_key(&mut self, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      self.outcome = Some(SessionOutcome::Cancelled);
      return;
    }
    if self.editing.is_some() {
      self.handle_edit_key(key);
      return;
    }

    match key.code {
      KeyCode::Esc | KeyCode::Char('q') => self.outcome = Some(SessionOutcome::Cancelled),
      KeyCode::Tab | KeyCode::Down | KeyCode::Char('j') => self.move_focus(true),
      KeyCode::BackTab | KeyCode::Up | KeyCode::Char('k') => self.move_focus(false),
      KeyCode::Char(' ') => match self.focus {
        Focus::Amend => self.toggle_amend(),
        Focus::Commit => self.toggle_link(),
        Focus::Author | Focus::Submit => {}
      },
      KeyCode::Enter => match self.focus {
        Focus::Amend => self.toggle_amend(),
        Focus::Author | Focus::Commit => self.start_edit(),
        Focus::Submit => self.submit(),
      },
      KeyCode::Char('e') => self.start_edit(),
      KeyCode::Char('l') => self.toggle_link(),
      KeyCode::Char('u') => self.release(),
      KeyCode::Char('s') => self.submit(),
      KeyCode::Char(c @ '1'..='9') => self.pick_preset(c as usize - '1' as usize),
      _ => {}
    }
  }

  fn handle_edit_key(&mut self, key: KeyEvent) {
    let Some(buffer) = self.editing.as_mut() else {
      return;
    };
    match key.code {
      KeyCode::Char(c) => buffer.push(c),
      KeyCode::Backspace => {
        buffer.pop();
      }
      KeyCode::Esc => {
        self.editing = None;
        self.status = Some(Status::Info("edit discarded".into()));
      }
      KeyCode::Enter => {
        let raw = self.editing.take().unwrap_or_default();
        if let Some(id) = self.focus.field() {
          let result = self.form.set_text(id, raw.trim());
          if result.is_err() {
            // keep the typed text so it can be fixed
            self.editing = Some(raw);
          }
          self.report(result, None);
        }
      }
      _ => {}
    }
  }

  fn start_edit(&mut self) {
    let Some(id) = self.focus.field() else {
      return;
    };
    match self.form.read_only_reason(id) {
      Some(reason) => self.status = Some(Status::Error(format!("the {id} is read-only: {reason}"))),
      None => {
        self.editing = Some(self.form.field(id).value.to_string());
        self.status = Some(Status::Info("Enter to confirm, Esc to discard".into()));
      }
    }
  }

  fn toggle_amend(&mut self) {
    let amend = !self.form.amend();
    let result = self.form.set_amend(amend);
    self.report(result, None);
  }

  fn toggle_link(&mut self) {
    let result = self.form.toggle_link();
    self.report(result, None);
  }

  fn release(&mut self) {
    let Some(id) = self.focus.field() else {
      return;
    };
    let result = self.form.release(id);
    self.report(result, Some("value released"));
  }

  fn pick_preset(&mut self, index: usize) {
    let Some(id) = self.focus.field() else {
      self.status = Some(Status::Error("focus a date field to apply a preset".into()));
      return;
    };
    let result = self.form.apply_preset(id, index);
    self.report(result, None);
  }

  fn submit(&mut self) {
    self.outcome = Some(SessionOutcome::Submitted(self.form.submit()));
  }
}
