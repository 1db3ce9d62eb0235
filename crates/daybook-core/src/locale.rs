//! User-facing text selection.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{error::Error, record::UpsertOutcome};

/// Language used for status messages, validation messages and labels.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
  #[default]
  En,
  Ja,
}

impl FromStr for Locale {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "en" => Ok(Self::En),
      "ja" => Ok(Self::Ja),
      other => Err(Error::UnknownLocale(other.to_owned())),
    }
  }
}

/// The transient status line shown after a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
  Created,
  Updated,
  /// Any store failure. Transient and permanent failures are not told apart.
  Failed,
}

impl Status {
  pub fn message(self, locale: Locale) -> &'static str {
    match (self, locale) {
      (Self::Created, Locale::En) => "Saved.",
      (Self::Created, Locale::Ja) => "保存しました",
      (Self::Updated, Locale::En) => "Updated.",
      (Self::Updated, Locale::Ja) => "更新しました",
      (Self::Failed, Locale::En) => "Could not save. Please try again.",
      (Self::Failed, Locale::Ja) => "保存に失敗しました",
    }
  }

  pub fn is_failure(self) -> bool { matches!(self, Self::Failed) }
}

impl From<UpsertOutcome> for Status {
  fn from(outcome: UpsertOutcome) -> Self {
    match outcome {
      UpsertOutcome::Created => Self::Created,
      UpsertOutcome::Updated => Self::Updated,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_messages_per_locale() {
    assert_eq!(Status::Created.message(Locale::En), "Saved.");
    assert_eq!(Status::Updated.message(Locale::En), "Updated.");
    assert_eq!(Status::Failed.message(Locale::Ja), "保存に失敗しました");
    assert!(Status::Failed.is_failure());
    assert!(!Status::from(UpsertOutcome::Updated).is_failure());
  }

  #[test]
  fn locale_parses_case_insensitively() {
    assert_eq!("JA".parse::<Locale>().unwrap(), Locale::Ja);
    assert_eq!(" en ".parse::<Locale>().unwrap(), Locale::En);
    assert!(matches!("fr".parse::<Locale>(), Err(Error::UnknownLocale(_))));
  }
}
