//! Journal records: one free-text entry per date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  record::{Record, RecordKind},
  validation::{Field, JOURNAL_MAX_CHARS, Problem, ValidationErrors},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journal {
  pub date:    NaiveDate,
  pub content: String,
}

impl Journal {
  /// Content must be non-blank and at most [`JOURNAL_MAX_CHARS`] characters.
  pub fn new(
    date: NaiveDate,
    content: impl Into<String>,
  ) -> Result<Self, ValidationErrors> {
    let content = content.into();
    let mut errors = ValidationErrors::new();
    if content.trim().is_empty() {
      errors.push(Field::Content, Problem::Required);
    } else if content.chars().count() > JOURNAL_MAX_CHARS {
      errors.push(Field::Content, Problem::TooLong {
        max: JOURNAL_MAX_CHARS,
      });
    }
    errors.into_result(Self { date, content })
  }
}

impl Record for Journal {
  type Key = NaiveDate;

  const KIND: RecordKind = RecordKind::Journal;

  fn key(&self) -> NaiveDate { self.date }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn day() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() }

  #[test]
  fn accepts_content_up_to_the_limit() {
    // Multi-byte characters count once each.
    let content = "日".repeat(JOURNAL_MAX_CHARS);
    assert!(Journal::new(day(), content).is_ok());
  }

  #[test]
  fn rejects_content_over_the_limit() {
    let err = Journal::new(day(), "a".repeat(JOURNAL_MAX_CHARS + 1)).unwrap_err();
    assert_eq!(
      err.for_field(Field::Content).map(|e| e.problem),
      Some(Problem::TooLong { max: 1000 })
    );
  }

  #[test]
  fn rejects_empty_content() {
    let err = Journal::new(day(), "").unwrap_err();
    assert_eq!(
      err.for_field(Field::Content).map(|e| e.problem),
      Some(Problem::Required)
    );
  }
}
