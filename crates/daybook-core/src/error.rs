//! Error types for `daybook-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown meal type: {0:?}")]
  UnknownMealType(String),

  #[error("invalid date: {0:?}")]
  InvalidDate(String),

  #[error("unknown locale: {0:?} (expected `en` or `ja`)")]
  UnknownLocale(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
