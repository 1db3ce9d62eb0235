//! Core types and trait definitions for Daybook.
//!
//! This crate is deliberately free of HTTP and database dependencies. It owns
//! the three record types (expenses, meals, journal entries), their validation
//! rules, and the [`store::RecordStore`] abstraction every backend implements.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod expense;
pub mod form;
pub mod journal;
pub mod locale;
pub mod meal;
pub mod payload;
pub mod record;
pub mod store;
pub mod validation;

pub use error::{Error, Result};
pub use expense::{Expense, ExpenseItem};
pub use journal::Journal;
pub use locale::{Locale, Status};
pub use meal::{Meal, MealType};
pub use record::{Record, RecordKind, Saved, Stored, UpsertOutcome};
pub use store::{DateRange, DaybookStore, RecordStore, Store};
