//! Meal records: one per (date, meal type).

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  Error, Locale,
  record::{Record, RecordKind},
  validation::{Field, Problem, ValidationErrors},
};

/// The four meals of a day, in the order they are listed.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
  Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
  Breakfast,
  Lunch,
  Dinner,
  Snack,
}

impl MealType {
  pub const ALL: [MealType; 4] =
    [Self::Breakfast, Self::Lunch, Self::Dinner, Self::Snack];

  /// The string stored in the `meal_type` column and used in URLs.
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Breakfast => "breakfast",
      Self::Lunch => "lunch",
      Self::Dinner => "dinner",
      Self::Snack => "snack",
    }
  }

  pub fn label(self, locale: Locale) -> &'static str {
    match (self, locale) {
      (Self::Breakfast, Locale::En) => "Breakfast",
      (Self::Lunch, Locale::En) => "Lunch",
      (Self::Dinner, Locale::En) => "Dinner",
      (Self::Snack, Locale::En) => "Snack",
      (Self::Breakfast, Locale::Ja) => "朝",
      (Self::Lunch, Locale::Ja) => "昼",
      (Self::Dinner, Locale::Ja) => "夜",
      (Self::Snack, Locale::Ja) => "間食",
    }
  }
}

impl fmt::Display for MealType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Accepts the English names case-insensitively, and the Japanese labels.
impl FromStr for MealType {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let trimmed = s.trim();
    match trimmed.to_lowercase().as_str() {
      "breakfast" | "朝" => Ok(Self::Breakfast),
      "lunch" | "昼" => Ok(Self::Lunch),
      "dinner" | "夜" => Ok(Self::Dinner),
      "snack" | "間食" => Ok(Self::Snack),
      _ => Err(Error::UnknownMealType(trimmed.to_owned())),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meal {
  pub date:      NaiveDate,
  pub meal_type: MealType,
  pub content:   String,
  pub calories:  i64,
}

impl Meal {
  /// Validate free-text content; the type system already covers the rest.
  pub fn new(
    date: NaiveDate,
    meal_type: MealType,
    content: impl Into<String>,
    calories: i64,
  ) -> Result<Self, ValidationErrors> {
    let content = content.into();
    let mut errors = ValidationErrors::new();
    if content.trim().is_empty() {
      errors.push(Field::Content, Problem::Required);
    }
    errors.into_result(Self { date, meal_type, content, calories })
  }
}

/// Convert a calorie count that arrived as a float. Zero fractions such as
/// `300.0` are accepted; values outside the `i64` range are not truncated.
pub fn whole_calories(value: f64) -> Result<i64, Problem> {
  // `i64::MAX as f64` rounds up to 2^63, so the upper bound is exclusive.
  const LIMIT: f64 = 9_223_372_036_854_775_808.0;
  if !value.is_finite() {
    Err(Problem::NotANumber)
  } else if value.fract() != 0.0 {
    Err(Problem::NotAnInteger)
  } else if value < -LIMIT || value >= LIMIT {
    Err(Problem::TooLarge)
  } else {
    Ok(value as i64)
  }
}

impl Record for Meal {
  type Key = (NaiveDate, MealType);

  const KIND: RecordKind = RecordKind::Meal;

  fn key(&self) -> Self::Key { (self.date, self.meal_type) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn whole_calories_rejects_fractions_and_out_of_range() {
    assert_eq!(whole_calories(300.0), Ok(300));
    assert_eq!(whole_calories(-0.0), Ok(0));
    assert_eq!(whole_calories(12.5), Err(Problem::NotAnInteger));
    assert_eq!(whole_calories(1e30), Err(Problem::TooLarge));
    assert_eq!(whole_calories(-1e30), Err(Problem::TooLarge));
    assert_eq!(whole_calories(f64::INFINITY), Err(Problem::NotANumber));
  }

  #[test]
  fn parses_english_and_japanese_names() {
    assert_eq!("breakfast".parse::<MealType>().unwrap(), MealType::Breakfast);
    assert_eq!("Lunch".parse::<MealType>().unwrap(), MealType::Lunch);
    assert_eq!("夜".parse::<MealType>().unwrap(), MealType::Dinner);
    assert_eq!("間食".parse::<MealType>().unwrap(), MealType::Snack);
  }

  #[test]
  fn rejects_other_meal_types() {
    assert!(matches!(
      "brunch".parse::<MealType>(),
      Err(Error::UnknownMealType(s)) if s == "brunch"
    ));
    assert!("".parse::<MealType>().is_err());
  }

  #[test]
  fn ordering_follows_the_day() {
    let mut types = vec![MealType::Snack, MealType::Breakfast, MealType::Dinner];
    types.sort();
    assert_eq!(types, [MealType::Breakfast, MealType::Dinner, MealType::Snack]);
  }

  #[test]
  fn content_is_required() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let err = Meal::new(date, MealType::Lunch, " ", 500).unwrap_err();
    assert!(err.for_field(Field::Content).is_some());

    let meal = Meal::new(date, MealType::Lunch, "ramen", 650).unwrap();
    assert_eq!(meal.key(), (date, MealType::Lunch));
  }
}
