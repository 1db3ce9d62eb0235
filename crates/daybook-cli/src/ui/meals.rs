//! Meals tab.

use daybook_core::{MealType, validation::Field};
use ratatui::{Frame, layout::Rect, text::Line, widgets::Paragraph};

use super::{error_line, field_line, hint};
use crate::app::{App, MealFocus};

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let editor = &app.meal;
  let locale = app.locale;

  let meal_type = match editor.form.meal_type.parse::<MealType>() {
    Ok(t) => format!("‹ {} ›", t.label(locale)),
    Err(_) if editor.form.meal_type.is_empty() => "‹ — ›".to_string(),
    Err(_) => editor.form.meal_type.clone(),
  };

  let mut lines: Vec<Line> = Vec::new();
  lines.push(field_line(
    hint(locale, "Date", "日付"),
    &editor.form.date,
    editor.focus == MealFocus::Date,
  ));
  lines.extend(error_line(app.error_for(Field::Date)));
  lines.push(field_line(
    hint(locale, "Meal", "食事タイプ"),
    &meal_type,
    editor.focus == MealFocus::MealType,
  ));
  lines.extend(error_line(app.error_for(Field::MealType)));
  lines.push(field_line(
    hint(locale, "Content", "内容"),
    &editor.form.content,
    editor.focus == MealFocus::Content,
  ));
  lines.extend(error_line(app.error_for(Field::Content)));
  lines.push(field_line(
    hint(locale, "Calories", "カロリー"),
    &editor.form.calories,
    editor.focus == MealFocus::Calories,
  ));
  lines.extend(error_line(app.error_for(Field::Calories)));

  f.render_widget(Paragraph::new(lines), area);
}
