//! Page handlers, one module per slice plus the index.

pub mod expenses;
pub mod index;
pub mod journal;
pub mod meals;

use chrono::NaiveDate;
use daybook_core::record::parse_date;
use serde::Deserialize;

use crate::error::Error;

/// Query string accepted by the pages that open on a particular day.
#[derive(Debug, Default, Deserialize)]
pub struct DateQuery {
  pub date: Option<String>,
}

impl DateQuery {
  /// The requested day, or today when absent or blank.
  pub fn resolve(&self) -> Result<NaiveDate, Error> {
    match self.date.as_deref().map(str::trim) {
      None | Some("") => Ok(today()),
      Some(raw) => parse_date(raw).map_err(|e| Error::BadRequest(e.to_string())),
    }
  }
}

pub fn today() -> NaiveDate { chrono::Local::now().date_naive() }

/// First value submitted for `key`, or empty.
pub(crate) fn field(fields: &[(String, String)], key: &str) -> String {
  fields
    .iter()
    .find(|(k, _)| k == key)
    .map(|(_, v)| v.clone())
    .unwrap_or_default()
}
