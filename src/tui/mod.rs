//! Interactive terminal session over a [`CommitForm`].

mod app;
mod ui;

use std::io::IsTerminal;
use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use crossterm::event::{self, Event, KeyEventKind};
use tracing::debug;

use crate::form::CommitForm;
use crate::model::SessionOutcome;

use app::App;

/// Run the form until the user submits or cancels. The terminal is restored on every path.
pub fn run(form: CommitForm, tick: Duration) -> Result<SessionOutcome> {
  if !std::io::stdout().is_terminal() || !std::io::stdin().is_terminal() {
    bail!("interactive mode needs a terminal; pass --yes to submit without the form");
  }
  let mut terminal = ratatui::init();
  let result = event_loop(&mut terminal, App::new(form), tick);
  ratatui::restore();
  result
}

fn event_loop(terminal: &mut ratatui::DefaultTerminal, mut app: App, tick: Duration) -> Result<SessionOutcome> {
  let mut last_tick = Instant::now();
  loop {
    terminal.draw(|f| ui::render(f, &app))?;

    let timeout = tick.saturating_sub(last_tick.elapsed());
    if event::poll(timeout)? {
      match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key),
        _ => {}
      }
    }

    if last_tick.elapsed() >= tick {
      if app.on_tick() {
        debug!("clock-driven fields refreshed");
      }
      last_tick = Instant::now();
    }

    if let Some(outcome) = app.outcome.take() {
      return Ok(outcome);
    }
  }
}
