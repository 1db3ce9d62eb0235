//! TUI rendering: header with tabs, the active form, status bar.

pub mod expenses;
pub mod journal;
pub mod meals;

use chrono::Local;
use daybook_core::Locale;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Tabs},
};

use crate::app::{App, Tab};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  draw_body(f, rows[1], app);
  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let date = Local::now().format("%Y-%m-%d").to_string();

  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Min(0), Constraint::Length(date.len() as u16 + 1)])
    .split(area);

  let titles = Tab::ALL.iter().enumerate().map(|(i, t)| {
    Line::from(format!("F{} {}", i + 1, t.title(app.locale)))
  });
  let tabs = Tabs::new(titles)
    .select(app.tab.index())
    .style(Style::default().fg(Color::White).bg(Color::DarkGray))
    .highlight_style(
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    );
  f.render_widget(tabs, cols[0]);
  f.render_widget(
    Paragraph::new(format!("{date} "))
      .style(Style::default().fg(Color::Gray).bg(Color::DarkGray)),
    cols[1],
  );
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  let block = Block::default()
    .title(format!(" {} ", app.tab.title(app.locale)))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  match app.tab {
    Tab::Expenses => expenses::draw(f, inner, app),
    Tab::Meals => meals::draw(f, inner, app),
    Tab::Journal => journal::draw(f, inner, app),
  }
}

// ─── Shared field widgets ─────────────────────────────────────────────────────

/// One labelled input. The focused field shows a cursor.
pub(crate) fn field_line(label: &str, value: &str, focused: bool) -> Line<'static> {
  let label_style = if focused {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
  } else {
    Style::default().fg(Color::Cyan)
  };
  let mut spans = vec![
    Span::styled(format!("{label:<12}"), label_style),
    Span::raw(value.to_owned()),
  ];
  if focused {
    spans.push(Span::styled("▏", Style::default().fg(Color::Yellow)));
  }
  Line::from(spans)
}

/// The inline validation message under a field, if any.
pub(crate) fn error_line(message: Option<String>) -> Option<Line<'static>> {
  message.map(|m| {
    Line::from(Span::styled(
      format!("{:12}{m}", ""),
      Style::default().fg(Color::Red),
    ))
  })
}

pub(crate) fn hint(locale: Locale, en: &'static str, ja: &'static str) -> &'static str {
  match locale {
    Locale::En => en,
    Locale::Ja => ja,
  }
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let hints = match app.tab {
    Tab::Expenses => hint(
      app.locale,
      "Tab next  ^A add item  ^D remove item  PgUp/PgDn day  ^S save  Esc quit",
      "Tab 次へ  ^A 追加  ^D 削除  PgUp/PgDn 日付  ^S 保存  Esc 終了",
    ),
    Tab::Meals => hint(
      app.locale,
      "Tab next  ←→ meal type  PgUp/PgDn day  ^S save  Esc quit",
      "Tab 次へ  ←→ 食事タイプ  PgUp/PgDn 日付  ^S 保存  Esc 終了",
    ),
    Tab::Journal => hint(
      app.locale,
      "Tab date/content  PgUp/PgDn day  ^S save  Esc quit",
      "Tab 日付/内容  PgUp/PgDn 日付  ^S 保存  Esc 終了",
    ),
  };

  let (label, style, text) = match app.status {
    Some(status) if status.is_failure() => (
      "ERROR",
      Style::default().fg(Color::White).bg(Color::Red),
      status.message(app.locale).to_string(),
    ),
    Some(status) => (
      "OK",
      Style::default().fg(Color::Black).bg(Color::Green),
      status.message(app.locale).to_string(),
    ),
    None if !app.status_msg.is_empty() => (
      "NOTE",
      Style::default().fg(Color::Black).bg(Color::Yellow),
      app.status_msg.clone(),
    ),
    None => (
      "EDIT",
      Style::default().fg(Color::Black).bg(Color::Cyan),
      hints.to_string(),
    ),
  };

  let line = Line::from(vec![
    Span::styled(format!(" {label} "), style.add_modifier(Modifier::BOLD)),
    Span::styled(format!("  {text}"), Style::default().fg(Color::Gray)),
  ]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
