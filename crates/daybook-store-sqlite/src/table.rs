//! Table mappings for each record type.
//!
//! A [`Table`] names its table, its natural-key columns and its mutable value
//! columns, and converts between the record and column values. The generic
//! queries in [`crate::store`] are built from these descriptions, so adding a
//! record type means adding a table to the schema and one impl here.

use daybook_core::{Expense, ExpenseItem, Journal, Meal, MealType, Record};
use rusqlite::types::Value;

use crate::{
  Result,
  encode::{decode_date, encode_date, integer, real, text},
};

pub trait Table: Record {
  const NAME: &'static str;
  /// Natural-key columns; the first one is always `date`.
  const KEY_COLUMNS: &'static [&'static str];
  /// Columns replaced wholesale on every update.
  const VALUE_COLUMNS: &'static [&'static str];

  fn encode_key(key: &Self::Key) -> Vec<Value>;

  fn encode_values(&self) -> Result<Vec<Value>>;

  fn decode(key: &[Value], values: &[Value]) -> Result<Self>;

  /// `id, created_at, updated_at, <key columns>, <value columns>`
  fn select_columns() -> String {
    let mut cols = vec!["id", "created_at", "updated_at"];
    cols.extend_from_slice(Self::KEY_COLUMNS);
    cols.extend_from_slice(Self::VALUE_COLUMNS);
    cols.join(", ")
  }
}

// ─── Expenses ────────────────────────────────────────────────────────────────

impl Table for Expense {
  const NAME: &'static str = "expenses";
  const KEY_COLUMNS: &'static [&'static str] = &["date"];
  const VALUE_COLUMNS: &'static [&'static str] = &["items", "total"];

  fn encode_key(key: &Self::Key) -> Vec<Value> { vec![encode_date(*key)] }

  fn encode_values(&self) -> Result<Vec<Value>> {
    Ok(vec![
      Value::Text(serde_json::to_string(&self.items)?),
      Value::Real(self.total),
    ])
  }

  fn decode(key: &[Value], values: &[Value]) -> Result<Self> {
    let items: Vec<ExpenseItem> =
      serde_json::from_str(text(&values[0], "items")?)?;
    Ok(Self {
      date: decode_date(&key[0], "date")?,
      items,
      total: real(&values[1], "total")?,
    })
  }
}

// ─── Meals ───────────────────────────────────────────────────────────────────

impl Table for Meal {
  const NAME: &'static str = "meals";
  const KEY_COLUMNS: &'static [&'static str] = &["date", "meal_type"];
  const VALUE_COLUMNS: &'static [&'static str] = &["content", "calories"];

  fn encode_key((date, meal_type): &Self::Key) -> Vec<Value> {
    vec![encode_date(*date), Value::Text(meal_type.as_str().to_owned())]
  }

  fn encode_values(&self) -> Result<Vec<Value>> {
    Ok(vec![
      Value::Text(self.content.clone()),
      Value::Integer(self.calories),
    ])
  }

  fn decode(key: &[Value], values: &[Value]) -> Result<Self> {
    Ok(Self {
      date:      decode_date(&key[0], "date")?,
      meal_type: text(&key[1], "meal_type")?.parse::<MealType>()?,
      content:   text(&values[0], "content")?.to_owned(),
      calories:  integer(&values[1], "calories")?,
    })
  }
}

// ─── Journals ────────────────────────────────────────────────────────────────

impl Table for Journal {
  const NAME: &'static str = "journals";
  const KEY_COLUMNS: &'static [&'static str] = &["date"];
  const VALUE_COLUMNS: &'static [&'static str] = &["content"];

  fn encode_key(key: &Self::Key) -> Vec<Value> { vec![encode_date(*key)] }

  fn encode_values(&self) -> Result<Vec<Value>> {
    Ok(vec![Value::Text(self.content.clone())])
  }

  fn decode(key: &[Value], values: &[Value]) -> Result<Self> {
    Ok(Self {
      date:    decode_date(&key[0], "date")?,
      content: text(&values[0], "content")?.to_owned(),
    })
  }
}
