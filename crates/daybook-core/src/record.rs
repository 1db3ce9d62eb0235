//! The [`Record`] abstraction shared by all three slices, and the envelopes a
//! store wraps records in.
//!
//! Every record is identified by a *natural key*: the user-meaningful fields
//! that pick out at most one stored row (a date, or a date plus meal type).
//! The surrogate `id` exists only so a row keeps its identity across updates.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{Error, Result};

/// Wire and storage format for dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
    .map_err(|_| Error::InvalidDate(s.to_owned()))
}

/// Which slice a record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
  Expense,
  Meal,
  Journal,
}

impl fmt::Display for RecordKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Expense => "expense",
      Self::Meal => "meal",
      Self::Journal => "journal",
    })
  }
}

/// A validated record that can be saved under its natural key.
pub trait Record:
  fmt::Debug + Clone + Send + Sync + Serialize + DeserializeOwned + 'static
{
  /// The natural key. Listings are ordered by it.
  type Key: fmt::Debug + Clone + Ord + Send + Sync + 'static;

  const KIND: RecordKind;

  fn key(&self) -> Self::Key;
}

/// Whether an upsert created a new row or replaced the fields of an existing
/// one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertOutcome {
  Created,
  Updated,
}

/// A record as persisted, with its surrogate identity and timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stored<R> {
  pub id:         Uuid,
  /// Set on first save; survives every later update.
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  #[serde(flatten)]
  pub record:     R,
}

/// The result of [`crate::store::RecordStore::upsert`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Saved<R> {
  pub outcome: UpsertOutcome,
  pub stored:  Stored<R>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_iso_dates() {
    let d = parse_date("2024-01-01").unwrap();
    assert_eq!(d, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    assert_eq!(parse_date(" 2024-02-29 ").unwrap().to_string(), "2024-02-29");
  }

  #[test]
  fn rejects_malformed_dates() {
    assert!(matches!(parse_date(""), Err(Error::InvalidDate(_))));
    assert!(parse_date("2023-02-29").is_err());
    assert!(parse_date("01/02/2024").is_err());
  }
}
