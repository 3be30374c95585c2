use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use super::app::{App, Focus, Status};
use crate::form::Lock;
use crate::model::FieldId;

/// Render the full form.
pub fn render(f: &mut Frame, app: &App) {
  let amend_rows = if app.form.rules().amend_available { 1 } else { 0 };
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1),          // title
      Constraint::Length(amend_rows), // amend toggle
      Constraint::Length(4),          // author
      Constraint::Length(5),          // commit + link
      Constraint::Min(3),             // presets + notice
      Constraint::Length(1),          // submit
      Constraint::Length(1),          // status bar
    ])
    .split(f.area());

  render_title(f, app, chunks[0]);
  if amend_rows > 0 {
    render_amend(f, app, chunks[1]);
  }
  render_field(f, app, FieldId::Author, chunks[2]);
  render_field(f, app, FieldId::Commit, chunks[3]);
  render_presets(f, app, chunks[4]);
  render_submit(f, app, chunks[5]);
  render_status_bar(f, app, chunks[6]);
}

fn render_title(f: &mut Frame, app: &App, area: Rect) {
  let snapshot = app.form.snapshot();
  let state = if snapshot.is_rebase() {
    "rebase in progress"
  } else if snapshot.is_merge() {
    "merge in progress"
  } else if !snapshot.has_head() {
    "first commit"
  } else {
    "new commit"
  };
  let line = Line::from(vec![
    Span::styled(" Commit with Date ", Style::default().add_modifier(Modifier::BOLD)),
    Span::styled(format!("({state})"), Style::default().fg(Color::DarkGray)),
  ]);
  f.render_widget(Paragraph::new(line), area);
}

fn focus_style(app: &App, focus: Focus) -> Style {
  if app.focus == focus {
    Style::default().fg(Color::Cyan)
  } else {
    Style::default().fg(Color::DarkGray)
  }
}

fn checkbox(checked: bool) -> &'static str {
  if checked {
    "[x]"
  } else {
    "[ ]"
  }
}

fn render_amend(f: &mut Frame, app: &App, area: Rect) {
  let line = Line::from(vec![
    Span::styled(format!(" {} ", checkbox(app.form.amend())), focus_style(app, Focus::Amend)),
    Span::raw("Amend HEAD"),
  ]);
  f.render_widget(Paragraph::new(line), area);
}

fn render_field(f: &mut Frame, app: &App, id: FieldId, area: Rect) {
  let focus = if id == FieldId::Author { Focus::Author } else { Focus::Commit };
  let field = app.form.field(id);
  let block = Block::default()
    .title(format!(" {} ", id.label()))
    .borders(Borders::ALL)
    .border_style(focus_style(app, focus));

  let mut lines = Vec::new();
  match (&app.editing, app.focus == focus) {
    (Some(buffer), true) => lines.push(Line::from(vec![
      Span::styled(format!(" {buffer}"), Style::default().add_modifier(Modifier::BOLD)),
      Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ])),
    _ => {
      let style = if app.form.is_editable(id) {
        Style::default()
      } else {
        Style::default().fg(Color::DarkGray)
      };
      lines.push(Line::from(Span::styled(format!(" {}", field.value), style)));
    }
  }

  let hint = match &field.lock {
    Lock::Open => None,
    Lock::Forced { reason } => Some(format!(" locked: {reason} (u to release)")),
    Lock::TracksNow { reason } => Some(format!(" follows the clock: {reason}")),
  };
  if let Some(hint) = hint {
    lines.push(Line::from(Span::styled(hint, Style::default().fg(Color::Yellow))));
  }

  if id == FieldId::Commit {
    let link = app.form.link();
    let text = match &link.forced_reason {
      Some(reason) => format!(" {} Use Author Date ({reason})", checkbox(link.checked)),
      None => format!(" {} Use Author Date", checkbox(link.checked)),
    };
    lines.push(Line::from(text));
  }

  f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_presets(f: &mut Frame, app: &App, area: Rect) {
  let mut lines: Vec<Line> = app
    .form
    .presets()
    .iter()
    .enumerate()
    .take(9)
    .map(|(i, preset)| {
      let mut spans = vec![
        Span::styled(format!(" {} ", i + 1), Style::default().fg(Color::Cyan)),
        Span::raw(preset.label.clone()),
      ];
      if let Some(tip) = &preset.tooltip {
        spans.push(Span::styled(format!("  {tip}"), Style::default().fg(Color::DarkGray)));
      }
      Line::from(spans)
    })
    .collect();

  if let Some(notice) = &app.form.rules().notice {
    lines.push(Line::from(Span::styled(notice.clone(), Style::default().fg(Color::Yellow))));
  }

  let block = Block::default().title(" Presets ").borders(Borders::TOP);
  f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

fn render_submit(f: &mut Frame, app: &App, area: Rect) {
  let caption = format!(" [ {} ] ", app.form.rules().action.caption());
  let style = if app.focus == Focus::Submit {
    Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
  } else {
    Style::default().add_modifier(Modifier::BOLD)
  };
  f.render_widget(Paragraph::new(Line::from(Span::styled(caption, style))), area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
  let line = match &app.status {
    Some(Status::Error(msg)) => Line::from(Span::styled(format!(" {msg}"), Style::default().fg(Color::Red))),
    Some(Status::Info(msg)) => Line::from(Span::styled(format!(" {msg}"), Style::default().fg(Color::Green))),
    None => Line::from(Span::styled(
      " Tab: move  1-9: preset  e: edit  l: link  u: release  s: submit  q: cancel",
      Style::default().fg(Color::DarkGray),
    )),
  };
  f.render_widget(Paragraph::new(line), area);
}
