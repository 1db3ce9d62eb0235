//! Journal tab: date picker over a free-text entry.

use daybook_core::validation::{Field, JOURNAL_MAX_CHARS};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Style},
  text::{Line, Span, Text},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use super::{error_line, field_line, hint};
use crate::app::{App, JournalFocus};

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let editor = &app.journal;
  let locale = app.locale;

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(2), Constraint::Min(3), Constraint::Length(1)])
    .split(area);

  let mut header = vec![field_line(
    hint(locale, "Date", "日付"),
    &editor.form.date,
    editor.focus == JournalFocus::Date,
  )];
  if app.journal_loading() {
    header.push(Line::from(Span::styled(
      hint(locale, "            loading…", "            読み込み中…"),
      Style::default().fg(Color::DarkGray),
    )));
  } else if let Some(line) = error_line(app.error_for(Field::Date)) {
    header.push(line);
  } else {
    let (state, color) = if editor.form.exists {
      (hint(locale, "            editing", "            編集中"), Color::Yellow)
    } else {
      (hint(locale, "            new entry", "            新規"), Color::Green)
    };
    header.push(Line::from(Span::styled(state, Style::default().fg(color))));
  }
  f.render_widget(Paragraph::new(header), rows[0]);

  let focused = editor.focus == JournalFocus::Content;
  let border = if focused { Color::Cyan } else { Color::DarkGray };
  let mut content = editor.form.content.clone();
  if focused {
    content.push('▏');
  }
  f.render_widget(
    Paragraph::new(Text::from(content))
      .wrap(Wrap { trim: false })
      .block(
        Block::default()
          .borders(Borders::ALL)
          .border_style(Style::default().fg(border)),
      ),
    rows[1],
  );

  let count = editor.form.content.chars().count();
  let footer = error_line(app.error_for(Field::Content)).unwrap_or_else(|| {
    let style = if count > JOURNAL_MAX_CHARS {
      Style::default().fg(Color::Red)
    } else {
      Style::default().fg(Color::DarkGray)
    };
    Line::from(Span::styled(format!("{count} / {JOURNAL_MAX_CHARS}"), style))
  });
  f.render_widget(Paragraph::new(footer), rows[2]);
}
