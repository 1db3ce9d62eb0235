//! The store traits and supporting query types.
//!
//! Backends (e.g. `daybook-store-sqlite`) implement [`RecordStore`] once per
//! record type. Higher layers (`daybook-api`, `daybook-web`) depend on these
//! abstractions, never on a concrete backend.

use std::future::Future;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  expense::Expense,
  journal::Journal,
  meal::Meal,
  record::{Record, Saved, Stored},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Inclusive date range for [`RecordStore::list`]. A missing bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
  pub from: Option<NaiveDate>,
  pub to:   Option<NaiveDate>,
}

impl DateRange {
  /// The range containing only `date`.
  pub fn day(date: NaiveDate) -> Self {
    Self { from: Some(date), to: Some(date) }
  }
}

// ─── Traits ──────────────────────────────────────────────────────────────────

/// Carries the backend's error type so every [`RecordStore`] impl on one
/// backend shares it.
pub trait Store: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;
}

/// Keyed persistence for one record type.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait RecordStore<R: Record>: Store {
  /// Point lookup by natural key. A missing row is `Ok(None)`, not an error.
  fn find(
    &self,
    key: R::Key,
  ) -> impl Future<Output = Result<Option<Stored<R>>, Self::Error>> + Send + '_;

  /// Insert `record`, or replace the mutable fields of the row already
  /// holding its natural key, as one atomic operation.
  ///
  /// Implementations must guarantee at most one row per natural key even
  /// under concurrent calls.
  fn upsert(
    &self,
    record: R,
  ) -> impl Future<Output = Result<Saved<R>, Self::Error>> + Send + '_;

  /// All records whose date falls in `range`, ordered by natural key.
  fn list(
    &self,
    range: DateRange,
  ) -> impl Future<Output = Result<Vec<Stored<R>>, Self::Error>> + Send + '_;
}

/// A backend that stores all three record types.
pub trait DaybookStore:
  RecordStore<Expense> + RecordStore<Meal> + RecordStore<Journal>
{
}

impl<T> DaybookStore for T where
  T: RecordStore<Expense> + RecordStore<Meal> + RecordStore<Journal>
{
}
