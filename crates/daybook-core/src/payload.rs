//! JSON request and response bodies shared by the API server and its
//! clients.
//!
//! Natural-key fields travel in the URL path, so the request bodies carry
//! only the mutable fields. Expense bodies never carry a total; the server
//! derives it from the items.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  expense::{Expense, ExpenseItem},
  journal::Journal,
  meal::{Meal, MealType, whole_calories},
  record::{Stored, UpsertOutcome},
  validation::{Field, ValidationErrors},
};

/// Body of `PUT /expenses/{date}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseBody {
  pub items: Vec<ExpenseItem>,
}

impl ExpenseBody {
  pub fn into_record(self, date: NaiveDate) -> Result<Expense, ValidationErrors> {
    Expense::new(date, self.items)
  }
}

/// Body of `PUT /meals/{date}/{meal_type}`.
///
/// `calories` is read as any JSON number so that `12.5` is reported as a
/// field error rather than a malformed body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealBody {
  pub content:  String,
  pub calories: f64,
}

impl MealBody {
  pub fn new(meal: &Meal) -> Self {
    Self { content: meal.content.clone(), calories: meal.calories as f64 }
  }

  pub fn into_record(
    self,
    date: NaiveDate,
    meal_type: MealType,
  ) -> Result<Meal, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let calories = whole_calories(self.calories).unwrap_or_else(|problem| {
      errors.push(Field::Calories, problem);
      0
    });
    match Meal::new(date, meal_type, self.content, calories) {
      Ok(meal) => errors.into_result(meal),
      Err(semantic) => {
        errors.extend(semantic);
        Err(errors)
      }
    }
  }
}

/// Body of `PUT /journals/{date}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalBody {
  pub content: String,
}

impl JournalBody {
  pub fn into_record(self, date: NaiveDate) -> Result<Journal, ValidationErrors> {
    Journal::new(date, self.content)
  }
}

/// Response to every `PUT`: the outcome, the localised status line, and the
/// stored record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveResponse<R> {
  pub outcome: UpsertOutcome,
  pub message: String,
  pub record:  Stored<R>,
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::validation::Problem;

  fn day() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() }

  #[test]
  fn meal_body_checks_calories_and_content_together() {
    let body = MealBody { content: " ".into(), calories: 12.5 };
    let errs = body.into_record(day(), MealType::Lunch).unwrap_err();
    assert_eq!(
      errs.for_field(Field::Calories).map(|e| e.problem),
      Some(Problem::NotAnInteger)
    );
    assert_eq!(
      errs.for_field(Field::Content).map(|e| e.problem),
      Some(Problem::Required)
    );
  }

  #[test]
  fn meal_body_accepts_integral_calories() {
    let meal = Meal::new(day(), MealType::Dinner, "curry", 800).unwrap();
    let body = MealBody::new(&meal);
    assert_eq!(body.into_record(day(), MealType::Dinner).unwrap(), meal);
  }
}
