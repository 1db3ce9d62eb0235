//! Server-rendered HTML fragments shared by the page handlers.
//!
//! Pages are plain strings; every user-supplied value passes through
//! [`escape`] before it is interpolated.

use std::{borrow::Cow, fmt::Write as _};

use axum::response::Html;
use daybook_core::{
  Locale, Status,
  validation::{Field, ValidationErrors},
};

pub fn escape(raw: &str) -> Cow<'_, str> { quick_xml::escape::escape(raw) }

/// Pick the English or Japanese variant of a fixed UI string.
pub fn tr(locale: Locale, en: &'static str, ja: &'static str) -> &'static str {
  match locale {
    Locale::En => en,
    Locale::Ja => ja,
  }
}

fn lang(locale: Locale) -> &'static str {
  match locale {
    Locale::En => "en",
    Locale::Ja => "ja",
  }
}

// ─── Layout ──────────────────────────────────────────────────────────────────

/// Wrap `body` in the document shell with the navigation bar.
pub fn page(locale: Locale, title: &str, body: &str) -> Html<String> {
  let mut out = String::with_capacity(body.len() + 512);
  let _ = write!(
    out,
    "<!DOCTYPE html>\n<html lang=\"{lang}\">\n<head>\n\
     <meta charset=\"utf-8\">\n\
     <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
     <title>{title} · Daybook</title>\n</head>\n<body>\n\
     <nav><a href=\"/\">Daybook</a> | <a href=\"/expenses\">{expenses}</a> | \
     <a href=\"/meals\">{meals}</a> | <a href=\"/journal\">{journal}</a></nav>\n\
     <main>\n<h1>{title}</h1>\n{body}</main>\n</body>\n</html>\n",
    lang = lang(locale),
    title = escape(title),
    expenses = tr(locale, "Expenses", "支出"),
    meals = tr(locale, "Meals", "食事"),
    journal = tr(locale, "Journal", "日記"),
  );
  Html(out)
}

/// The transient status line after a submission, if any.
pub fn status_banner(status: Option<Status>, locale: Locale) -> String {
  match status {
    None => String::new(),
    Some(s) => {
      let class = if s.is_failure() { "status error" } else { "status ok" };
      format!(
        "<p class=\"{class}\" role=\"status\">{}</p>\n",
        escape(s.message(locale))
      )
    }
  }
}

/// The inline message for `field`, or nothing when it passed validation.
pub fn field_error(
  errors: Option<&ValidationErrors>,
  field: Field,
  locale: Locale,
) -> String {
  errors
    .and_then(|e| e.for_field(field))
    .map(|e| {
      format!(
        "<span class=\"field-error\" data-field=\"{field}\">{}</span>",
        escape(&e.message(locale))
      )
    })
    .unwrap_or_default()
}

/// Format a monetary or calorie total without a trailing `.0`.
pub fn number(n: f64) -> String {
  if n.fract() == 0.0 && n.abs() < 1e15 {
    format!("{}", n as i64)
  } else {
    format!("{n:.2}")
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use daybook_core::validation::{FieldError, Problem};

  #[test]
  fn escape_neutralises_markup() {
    assert_eq!(escape("<b>&\"x\"</b>"), "&lt;b&gt;&amp;&quot;x&quot;&lt;/b&gt;");
    assert_eq!(escape("plain"), "plain");
  }

  #[test]
  fn field_error_renders_only_failing_fields() {
    let errors: ValidationErrors =
      FieldError::new(Field::Content, Problem::Required).into();
    let html = field_error(Some(&errors), Field::Content, Locale::En);
    assert!(html.contains("Content is required"), "{html}");
    assert!(field_error(Some(&errors), Field::Date, Locale::En).is_empty());
    assert!(field_error(None, Field::Content, Locale::En).is_empty());
  }

  #[test]
  fn status_banner_is_localised() {
    let html = status_banner(Some(Status::Updated), Locale::Ja);
    assert!(html.contains("更新しました"));
    assert!(status_banner(None, Locale::En).is_empty());
  }

  #[test]
  fn number_drops_zero_fraction() {
    assert_eq!(number(1600.0), "1600");
    assert_eq!(number(12.5), "12.50");
  }
}
