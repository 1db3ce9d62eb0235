//! Field-level validation errors.
//!
//! Validation never produces user-facing text directly. Each failure is a
//! ([`Field`], [`Problem`]) pair; [`FieldError::message`] renders it for a
//! [`Locale`] at the edge (HTML page, JSON body, terminal).

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::locale::Locale;

/// Upper bound on journal content, counted in Unicode scalar values.
pub const JOURNAL_MAX_CHARS: usize = 1000;

/// The form field a validation failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
  Date,
  Content,
  /// The expense item list as a whole.
  Items,
  ItemName(usize),
  ItemAmount(usize),
  MealType,
  Calories,
}

impl Field {
  fn label(self, locale: Locale) -> &'static str {
    match (self, locale) {
      (Self::Date, Locale::En) => "Date",
      (Self::Date, Locale::Ja) => "日付",
      (Self::Content, Locale::En) => "Content",
      (Self::Content, Locale::Ja) => "内容",
      (Self::Items, Locale::En) => "Items",
      (Self::Items, Locale::Ja) => "明細",
      (Self::ItemName(_), Locale::En) => "Item name",
      (Self::ItemName(_), Locale::Ja) => "項目名",
      (Self::ItemAmount(_), Locale::En) => "Amount",
      (Self::ItemAmount(_), Locale::Ja) => "金額",
      (Self::MealType, Locale::En) => "Meal type",
      (Self::MealType, Locale::Ja) => "食事タイプ",
      (Self::Calories, Locale::En) => "Calories",
      (Self::Calories, Locale::Ja) => "カロリー",
    }
  }
}

/// Dotted path used as the field name in HTML forms and JSON error bodies,
/// e.g. `items.0.amount`.
impl fmt::Display for Field {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Date => f.write_str("date"),
      Self::Content => f.write_str("content"),
      Self::Items => f.write_str("items"),
      Self::ItemName(i) => write!(f, "items.{i}.name"),
      Self::ItemAmount(i) => write!(f, "items.{i}.amount"),
      Self::MealType => f.write_str("meal_type"),
      Self::Calories => f.write_str("calories"),
    }
  }
}

/// What is wrong with a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Problem {
  Required,
  InvalidDate,
  NotANumber,
  Negative,
  NotAnInteger,
  /// Finite on its own, but out of range once stored or summed.
  TooLarge,
  TooLong { max: usize },
  NoItems,
  UnknownMealType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
  pub field:   Field,
  pub problem: Problem,
}

impl FieldError {
  pub fn new(field: Field, problem: Problem) -> Self { Self { field, problem } }

  /// Render the failure as a short sentence in `locale`.
  pub fn message(&self, locale: Locale) -> String {
    let label = self.field.label(locale);
    match (self.problem, locale) {
      (Problem::Required, Locale::En) => format!("{label} is required"),
      (Problem::Required, Locale::Ja) => format!("{label}は必須です"),
      (Problem::InvalidDate, Locale::En) => {
        format!("{label} must be a date (YYYY-MM-DD)")
      }
      (Problem::InvalidDate, Locale::Ja) => {
        format!("{label}は日付(YYYY-MM-DD)で入力してください")
      }
      (Problem::NotANumber, Locale::En) => format!("{label} must be a number"),
      (Problem::NotANumber, Locale::Ja) => format!("{label}は数値で入力してください"),
      (Problem::Negative, Locale::En) => format!("{label} must be 0 or greater"),
      (Problem::Negative, Locale::Ja) => {
        format!("{label}は0以上の値を入力してください")
      }
      (Problem::NotAnInteger, Locale::En) => {
        format!("{label} must be a whole number")
      }
      (Problem::NotAnInteger, Locale::Ja) => format!("{label}は整数で入力してください"),
      (Problem::TooLarge, Locale::En) => format!("{label} is too large"),
      (Problem::TooLarge, Locale::Ja) => format!("{label}が大きすぎます"),
      (Problem::TooLong { max }, Locale::En) => {
        format!("{label} must be {max} characters or less")
      }
      (Problem::TooLong { max }, Locale::Ja) => {
        format!("{label}は{max}文字以内で入力してください")
      }
      (Problem::NoItems, Locale::En) => "Add at least one item".to_string(),
      (Problem::NoItems, Locale::Ja) => "明細を1件以上追加してください".to_string(),
      (Problem::UnknownMealType, Locale::En) => {
        format!("{label} must be breakfast, lunch, dinner or snack")
      }
      (Problem::UnknownMealType, Locale::Ja) => {
        format!("{label}は朝・昼・夜・間食から選択してください")
      }
    }
  }
}

/// A rendered field error, as sent in JSON error bodies.
#[derive(Debug, Clone, Serialize)]
pub struct FieldMessage {
  pub field:   String,
  pub message: String,
}

/// One or more field failures collected while validating a single record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("validation failed on {} field(s)", .0.len())]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
  pub fn new() -> Self { Self::default() }

  pub fn push(&mut self, field: Field, problem: Problem) {
    self.0.push(FieldError::new(field, problem));
  }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  pub fn iter(&self) -> impl Iterator<Item = &FieldError> { self.0.iter() }

  /// The first failure recorded against `field`, if any.
  pub fn for_field(&self, field: Field) -> Option<&FieldError> {
    self.0.iter().find(|e| e.field == field)
  }

  /// Merge failures from a nested validation step.
  pub fn extend(&mut self, other: ValidationErrors) { self.0.extend(other.0); }

  /// `Ok(value)` if nothing was recorded, otherwise `Err(self)`.
  pub fn into_result<T>(self, value: T) -> Result<T, Self> {
    if self.is_empty() { Ok(value) } else { Err(self) }
  }

  pub fn messages(&self, locale: Locale) -> Vec<FieldMessage> {
    self
      .0
      .iter()
      .map(|e| FieldMessage {
        field:   e.field.to_string(),
        message: e.message(locale),
      })
      .collect()
  }
}

impl From<FieldError> for ValidationErrors {
  fn from(e: FieldError) -> Self { Self(vec![e]) }
}
