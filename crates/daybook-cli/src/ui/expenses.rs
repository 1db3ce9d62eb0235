//! Expenses tab: date, item rows, running total.

use daybook_core::validation::Field;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::Paragraph,
};

use super::{error_line, field_line, hint};
use crate::app::{App, ExpenseFocus};

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let editor = &app.expense;
  let locale = app.locale;
  let mut lines: Vec<Line> = Vec::new();

  lines.push(field_line(
    hint(locale, "Date", "日付"),
    &editor.form.date,
    editor.focus == ExpenseFocus::Date,
  ));
  lines.extend(error_line(app.error_for(Field::Date)));
  lines.push(Line::from(""));

  for (i, item) in editor.form.items.iter().enumerate() {
    let marker = if editor.focused_row() == Some(i) { "›" } else { " " };
    lines.push(Line::from(Span::styled(
      format!("{marker} #{}", i + 1),
      Style::default().fg(Color::DarkGray),
    )));
    lines.push(field_line(
      hint(locale, "  Item", "  項目名"),
      &item.name,
      editor.focus == ExpenseFocus::Name(i),
    ));
    lines.extend(error_line(app.error_for(Field::ItemName(i))));
    lines.push(field_line(
      hint(locale, "  Amount", "  金額"),
      &item.amount,
      editor.focus == ExpenseFocus::Amount(i),
    ));
    lines.extend(error_line(app.error_for(Field::ItemAmount(i))));
  }
  lines.extend(error_line(app.error_for(Field::Items)));

  lines.push(Line::from(""));
  lines.push(Line::from(vec![
    Span::styled(
      format!("{:<12}", hint(locale, "Total", "合計")),
      Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ),
    Span::raw(format!("{}", editor.form.total_preview())),
  ]));

  // Keep the focused row in view on small terminals.
  let focus_line = editor.focused_row().map(|i| 3 + i * 3).unwrap_or(0) as u16;
  let scroll = focus_line.saturating_sub(area.height.saturating_sub(4));
  f.render_widget(Paragraph::new(lines).scroll((scroll, 0)), area);
}
