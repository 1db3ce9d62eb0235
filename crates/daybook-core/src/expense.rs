//! Expense records: one per date, an ordered list of line items and their
//! total.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  record::{Record, RecordKind},
  validation::{Field, Problem, ValidationErrors},
};

/// A single named amount within an expense record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseItem {
  pub name:   String,
  pub amount: f64,
}

impl ExpenseItem {
  pub fn new(name: impl Into<String>, amount: f64) -> Self {
    Self { name: name.into(), amount }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
  pub date:  NaiveDate,
  pub items: Vec<ExpenseItem>,
  /// Sum of `items[*].amount`, computed by [`Expense::new`] at submit time.
  pub total: f64,
}

impl Expense {
  /// Validate the items and compute the total.
  ///
  /// Rejects an empty item list, blank item names, amounts that are
  /// negative or not finite, and items whose sum overflows.
  pub fn new(
    date: NaiveDate,
    items: Vec<ExpenseItem>,
  ) -> Result<Self, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if items.is_empty() {
      errors.push(Field::Items, Problem::NoItems);
    }
    for (i, item) in items.iter().enumerate() {
      if item.name.trim().is_empty() {
        errors.push(Field::ItemName(i), Problem::Required);
      }
      if !item.amount.is_finite() {
        errors.push(Field::ItemAmount(i), Problem::NotANumber);
      } else if item.amount < 0.0 {
        errors.push(Field::ItemAmount(i), Problem::Negative);
      }
    }
    let total = items.iter().map(|item| item.amount).sum::<f64>();
    if errors.is_empty() && !total.is_finite() {
      errors.push(Field::Items, Problem::TooLarge);
    }
    errors.into_result(Self { date, items, total })
  }
}

impl Record for Expense {
  type Key = NaiveDate;

  const KIND: RecordKind = RecordKind::Expense;

  fn key(&self) -> NaiveDate { self.date }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn day() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() }

  #[test]
  fn total_is_sum_of_items() {
    let e = Expense::new(day(), vec![
      ExpenseItem::new("lunch", 1200.0),
      ExpenseItem::new("coffee", 400.0),
    ])
    .unwrap();
    assert_eq!(e.total, 1600.0);
    assert_eq!(e.key(), day());
  }

  #[test]
  fn zero_amount_is_allowed() {
    let e = Expense::new(day(), vec![ExpenseItem::new("free sample", 0.0)]);
    assert_eq!(e.unwrap().total, 0.0);
  }

  #[test]
  fn empty_item_list_is_rejected() {
    let err = Expense::new(day(), vec![]).unwrap_err();
    assert_eq!(
      err.for_field(Field::Items).map(|e| e.problem),
      Some(Problem::NoItems)
    );
  }

  #[test]
  fn negative_and_non_finite_amounts_are_rejected() {
    let err = Expense::new(day(), vec![
      ExpenseItem::new("refund", -5.0),
      ExpenseItem::new("weird", f64::NAN),
    ])
    .unwrap_err();
    assert_eq!(
      err.for_field(Field::ItemAmount(0)).map(|e| e.problem),
      Some(Problem::Negative)
    );
    assert_eq!(
      err.for_field(Field::ItemAmount(1)).map(|e| e.problem),
      Some(Problem::NotANumber)
    );
  }

  #[test]
  fn overflowing_total_is_rejected() {
    let err = Expense::new(day(), vec![
      ExpenseItem::new("house", 1e308),
      ExpenseItem::new("yacht", 1e308),
    ])
    .unwrap_err();
    assert_eq!(
      err.for_field(Field::Items).map(|e| e.problem),
      Some(Problem::TooLarge)
    );
    assert!(err.for_field(Field::ItemAmount(0)).is_none());
  }

  #[test]
  fn blank_item_name_is_rejected() {
    let err =
      Expense::new(day(), vec![ExpenseItem::new("  ", 10.0)]).unwrap_err();
    assert!(err.for_field(Field::ItemName(0)).is_some());
  }
}
