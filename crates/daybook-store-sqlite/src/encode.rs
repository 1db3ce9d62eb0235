//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, dates as `YYYY-MM-DD`, and UUIDs
//! as hyphenated lowercase strings. Rows travel out of the connection thread
//! as [`RawRow`]s of untyped [`Value`]s and are decoded on the caller's side.

use chrono::{DateTime, NaiveDate, Utc};
use daybook_core::{Stored, record::DATE_FORMAT};
use rusqlite::types::Value;
use uuid::Uuid;

use crate::{Error, Result, table::Table};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(date: NaiveDate) -> Value {
  Value::Text(date.format(DATE_FORMAT).to_string())
}

pub fn decode_date(value: &Value, column: &'static str) -> Result<NaiveDate> {
  Ok(daybook_core::record::parse_date(text(value, column)?)?)
}

// ─── Untyped column access ───────────────────────────────────────────────────

pub fn text<'a>(value: &'a Value, column: &'static str) -> Result<&'a str> {
  match value {
    Value::Text(s) => Ok(s),
    _ => Err(Error::ColumnType { column }),
  }
}

pub fn integer(value: &Value, column: &'static str) -> Result<i64> {
  match value {
    Value::Integer(n) => Ok(*n),
    _ => Err(Error::ColumnType { column }),
  }
}

/// SQLite may hand back integral REAL values as INTEGER; accept both.
pub fn real(value: &Value, column: &'static str) -> Result<f64> {
  match value {
    Value::Real(f) => Ok(*f),
    Value::Integer(n) => Ok(*n as f64),
    _ => Err(Error::ColumnType { column }),
  }
}

// ─── Raw row ─────────────────────────────────────────────────────────────────

/// A row read as `id, created_at, updated_at, <key columns>, <value columns>`.
pub struct RawRow {
  pub id:         String,
  pub created_at: String,
  pub updated_at: String,
  pub columns:    Vec<Value>,
}

impl RawRow {
  /// Read a row laid out by [`Table::select_columns`].
  pub fn from_row<T: Table>(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    let width = T::KEY_COLUMNS.len() + T::VALUE_COLUMNS.len();
    let columns = (0..width)
      .map(|i| row.get::<_, Value>(3 + i))
      .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(Self {
      id: row.get(0)?,
      created_at: row.get(1)?,
      updated_at: row.get(2)?,
      columns,
    })
  }

  pub fn into_stored<T: Table>(self) -> Result<Stored<T>> {
    let (key, values) = self.columns.split_at(T::KEY_COLUMNS.len());
    Ok(Stored {
      id:         decode_uuid(&self.id)?,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
      record:     T::decode(key, values)?,
    })
  }
}
