//! Raw form state for the three slices.
//!
//! Form fields hold exactly what the user typed. `validate` parses them,
//! reports every failing field at once, and hands the parsed values to the
//! typed constructors ([`Expense::new`], [`Meal::new`], [`Journal::new`]) for
//! the semantic rules. A field that failed to parse is not reported twice.

use chrono::NaiveDate;

use crate::{
  expense::{Expense, ExpenseItem},
  journal::Journal,
  meal::{Meal, MealType, whole_calories},
  record::{DATE_FORMAT, parse_date},
  validation::{Field, Problem, ValidationErrors},
};

fn format_date(date: NaiveDate) -> String { date.format(DATE_FORMAT).to_string() }

fn parse_date_field(raw: &str, errors: &mut ValidationErrors) -> Option<NaiveDate> {
  if raw.trim().is_empty() {
    errors.push(Field::Date, Problem::Required);
    return None;
  }
  match parse_date(raw) {
    Ok(d) => Some(d),
    Err(_) => {
      errors.push(Field::Date, Problem::InvalidDate);
      None
    }
  }
}

/// Add the semantic failures from a constructor, skipping fields that
/// already carry a parse failure.
fn merge_semantic(errors: &mut ValidationErrors, semantic: ValidationErrors) {
  for e in semantic.iter() {
    if errors.for_field(e.field).is_none() {
      errors.push(e.field, e.problem);
    }
  }
}

// ─── Expenses ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseItemForm {
  pub name:   String,
  pub amount: String,
}

impl ExpenseItemForm {
  pub fn blank() -> Self {
    Self { name: String::new(), amount: "0".into() }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseForm {
  pub date:  String,
  pub items: Vec<ExpenseItemForm>,
}

impl ExpenseForm {
  /// A fresh form for `date` with one blank line item.
  pub fn new(date: NaiveDate) -> Self {
    Self {
      date:  format_date(date),
      items: vec![ExpenseItemForm::blank()],
    }
  }

  pub fn from_expense(expense: &Expense) -> Self {
    Self {
      date:  format_date(expense.date),
      items: expense
        .items
        .iter()
        .map(|item| ExpenseItemForm {
          name:   item.name.clone(),
          amount: item.amount.to_string(),
        })
        .collect(),
    }
  }

  pub fn add_item(&mut self) { self.items.push(ExpenseItemForm::blank()); }

  /// Remove the item at `index`; out-of-range indices are ignored.
  pub fn remove_item(&mut self, index: usize) {
    if index < self.items.len() {
      self.items.remove(index);
    }
  }

  /// Running total of the amounts that currently parse; the rest count as 0.
  pub fn total_preview(&self) -> f64 {
    self
      .items
      .iter()
      .filter_map(|item| item.amount.trim().parse::<f64>().ok())
      .filter(|amount| amount.is_finite())
      .sum()
  }

  pub fn validate(&self) -> Result<Expense, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let date = parse_date_field(&self.date, &mut errors);

    let items: Vec<ExpenseItem> = self
      .items
      .iter()
      .enumerate()
      .map(|(i, item)| {
        let raw = item.amount.trim();
        let amount = if raw.is_empty() {
          errors.push(Field::ItemAmount(i), Problem::Required);
          0.0
        } else {
          raw.parse::<f64>().unwrap_or_else(|_| {
            errors.push(Field::ItemAmount(i), Problem::NotANumber);
            0.0
          })
        };
        ExpenseItem::new(item.name.trim(), amount)
      })
      .collect();

    match Expense::new(date.unwrap_or(NaiveDate::MIN), items) {
      Ok(expense) => errors.into_result(expense),
      Err(semantic) => {
        merge_semantic(&mut errors, semantic);
        Err(errors)
      }
    }
  }
}

// ─── Meals ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MealForm {
  pub date:      String,
  pub meal_type: String,
  pub content:   String,
  pub calories:  String,
}

impl MealForm {
  pub fn new(date: NaiveDate) -> Self {
    Self { date: format_date(date), ..Self::default() }
  }

  pub fn from_meal(meal: &Meal) -> Self {
    Self {
      date:      format_date(meal.date),
      meal_type: meal.meal_type.as_str().to_owned(),
      content:   meal.content.clone(),
      calories:  meal.calories.to_string(),
    }
  }

  pub fn validate(&self) -> Result<Meal, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let date = parse_date_field(&self.date, &mut errors);

    let meal_type = if self.meal_type.trim().is_empty() {
      errors.push(Field::MealType, Problem::Required);
      None
    } else {
      match self.meal_type.parse::<MealType>() {
        Ok(t) => Some(t),
        Err(_) => {
          errors.push(Field::MealType, Problem::UnknownMealType);
          None
        }
      }
    };

    let calories = parse_calories(&self.calories).unwrap_or_else(|problem| {
      errors.push(Field::Calories, problem);
      0
    });

    match Meal::new(
      date.unwrap_or(NaiveDate::MIN),
      meal_type.unwrap_or(MealType::Breakfast),
      self.content.clone(),
      calories,
    ) {
      Ok(meal) => errors.into_result(meal),
      Err(semantic) => {
        merge_semantic(&mut errors, semantic);
        Err(errors)
      }
    }
  }
}

/// Whole numbers written with a zero fraction (`300.0`) are accepted.
fn parse_calories(raw: &str) -> Result<i64, Problem> {
  let raw = raw.trim();
  if raw.is_empty() {
    return Err(Problem::Required);
  }
  if let Ok(n) = raw.parse::<i64>() {
    return Ok(n);
  }
  match raw.parse::<f64>() {
    Ok(f) => whole_calories(f),
    Err(_) => Err(Problem::NotANumber),
  }
}

// ─── Journal ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JournalForm {
  pub date:    String,
  pub content: String,
  /// An entry is already stored for `date`, so saving edits it.
  pub exists:  bool,
}

impl JournalForm {
  /// The form for `date`, pre-filled from `existing` or left empty.
  pub fn for_date(date: NaiveDate, existing: Option<&Journal>) -> Self {
    Self {
      date:    format_date(date),
      content: existing.map(|j| j.content.clone()).unwrap_or_default(),
      exists:  existing.is_some(),
    }
  }

  /// Replace the content with `existing`, keeping the typed date.
  pub fn prefill(&mut self, existing: Option<&Journal>) {
    self.content = existing.map(|j| j.content.clone()).unwrap_or_default();
    self.exists = existing.is_some();
  }

  pub fn validate(&self) -> Result<Journal, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let date = parse_date_field(&self.date, &mut errors);
    match Journal::new(date.unwrap_or(NaiveDate::MIN), self.content.clone()) {
      Ok(journal) => errors.into_result(journal),
      Err(semantic) => {
        merge_semantic(&mut errors, semantic);
        Err(errors)
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn day() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() }

  fn problem(errs: &ValidationErrors, field: Field) -> Option<Problem> {
    errs.for_field(field).map(|e| e.problem)
  }

  // ── Expenses ──────────────────────────────────────────────────────────────

  #[test]
  fn expense_form_computes_total_at_submit() {
    let form = ExpenseForm {
      date:  "2024-01-01".into(),
      items: vec![
        ExpenseItemForm { name: "lunch".into(), amount: "1200".into() },
        ExpenseItemForm { name: "coffee".into(), amount: "400".into() },
      ],
    };
    let expense = form.validate().unwrap();
    assert_eq!(expense.date, day());
    assert_eq!(expense.total, 1600.0);
    assert_eq!(expense.items[1], ExpenseItem::new("coffee", 400.0));
  }

  #[test]
  fn expense_form_reports_every_bad_field() {
    let form = ExpenseForm {
      date:  "".into(),
      items: vec![
        ExpenseItemForm { name: "".into(), amount: "abc".into() },
        ExpenseItemForm { name: "taxi".into(), amount: "-1".into() },
      ],
    };
    let errs = form.validate().unwrap_err();
    assert_eq!(problem(&errs, Field::Date), Some(Problem::Required));
    assert_eq!(problem(&errs, Field::ItemName(0)), Some(Problem::Required));
    assert_eq!(problem(&errs, Field::ItemAmount(0)), Some(Problem::NotANumber));
    assert_eq!(problem(&errs, Field::ItemAmount(1)), Some(Problem::Negative));
    assert_eq!(errs.iter().count(), 4);
  }

  #[test]
  fn expense_form_rejects_empty_item_list() {
    let mut form = ExpenseForm::new(day());
    form.remove_item(0);
    let errs = form.validate().unwrap_err();
    assert_eq!(problem(&errs, Field::Items), Some(Problem::NoItems));
  }

  #[test]
  fn expense_form_add_and_remove_items() {
    let mut form = ExpenseForm::new(day());
    form.add_item();
    form.items[1].amount = "250".into();
    assert_eq!(form.items.len(), 2);
    assert_eq!(form.total_preview(), 250.0);
    form.remove_item(5);
    assert_eq!(form.items.len(), 2);
    form.remove_item(0);
    assert_eq!(form.items[0].amount, "250");
  }

  #[test]
  fn expense_form_round_trips_a_stored_expense() {
    let expense =
      Expense::new(day(), vec![ExpenseItem::new("bus", 230.0)]).unwrap();
    let form = ExpenseForm::from_expense(&expense);
    assert_eq!(form.validate().unwrap(), expense);
  }

  // ── Meals ─────────────────────────────────────────────────────────────────

  fn meal_form(meal_type: &str, calories: &str) -> MealForm {
    MealForm {
      date:      "2024-01-01".into(),
      meal_type: meal_type.into(),
      content:   "toast".into(),
      calories:  calories.into(),
    }
  }

  #[test]
  fn meal_form_accepts_valid_input() {
    let meal = meal_form("breakfast", "300").validate().unwrap();
    assert_eq!(meal.meal_type, MealType::Breakfast);
    assert_eq!(meal.calories, 300);
    assert_eq!(meal_form("朝", "300.0").validate().unwrap().calories, 300);
  }

  #[test]
  fn meal_form_rejects_unknown_type() {
    let errs = meal_form("brunch", "300").validate().unwrap_err();
    assert_eq!(problem(&errs, Field::MealType), Some(Problem::UnknownMealType));
    let errs = meal_form("", "300").validate().unwrap_err();
    assert_eq!(problem(&errs, Field::MealType), Some(Problem::Required));
  }

  #[test]
  fn meal_form_rejects_non_integer_calories() {
    let errs = meal_form("lunch", "12.5").validate().unwrap_err();
    assert_eq!(problem(&errs, Field::Calories), Some(Problem::NotAnInteger));
    let errs = meal_form("lunch", "lots").validate().unwrap_err();
    assert_eq!(problem(&errs, Field::Calories), Some(Problem::NotANumber));
    let errs = meal_form("lunch", "").validate().unwrap_err();
    assert_eq!(problem(&errs, Field::Calories), Some(Problem::Required));
  }

  #[test]
  fn meal_form_rejects_calories_outside_integer_range() {
    let errs = meal_form("lunch", "1e30").validate().unwrap_err();
    assert_eq!(problem(&errs, Field::Calories), Some(Problem::TooLarge));
    let errs =
      meal_form("lunch", "99999999999999999999").validate().unwrap_err();
    assert_eq!(problem(&errs, Field::Calories), Some(Problem::TooLarge));
  }

  #[test]
  fn meal_form_requires_content() {
    let mut form = meal_form("dinner", "800");
    form.content.clear();
    let errs = form.validate().unwrap_err();
    assert_eq!(problem(&errs, Field::Content), Some(Problem::Required));
  }

  // ── Journal ───────────────────────────────────────────────────────────────

  #[test]
  fn journal_form_prefills_from_existing_entry() {
    let entry = Journal::new(day(), "a quiet day").unwrap();
    let form = JournalForm::for_date(day(), Some(&entry));
    assert_eq!(form.date, "2024-01-01");
    assert_eq!(form.content, "a quiet day");
    assert!(form.exists);

    let blank = JournalForm::for_date(day(), None);
    assert!(blank.content.is_empty());
    assert!(!blank.exists);
  }

  #[test]
  fn journal_prefill_tracks_whether_an_entry_exists() {
    let entry = Journal::new(day(), "stored").unwrap();
    let mut form = JournalForm { date: "2024-01-01".into(), ..Default::default() };
    form.prefill(Some(&entry));
    assert_eq!(form.content, "stored");
    assert!(form.exists);

    form.date = "2024-01-02".into();
    form.prefill(None);
    assert_eq!(form.date, "2024-01-02");
    assert!(form.content.is_empty());
    assert!(!form.exists);
  }

  #[test]
  fn journal_form_rejects_bad_date_and_long_content() {
    let form = JournalForm {
      date:    "yesterday".into(),
      content: "x".repeat(1001),
      exists:  false,
    };
    let errs = form.validate().unwrap_err();
    assert_eq!(problem(&errs, Field::Date), Some(Problem::InvalidDate));
    assert_eq!(
      problem(&errs, Field::Content),
      Some(Problem::TooLong { max: 1000 })
    );
  }
}
