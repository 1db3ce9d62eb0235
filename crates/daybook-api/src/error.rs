//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use daybook_core::{
  Locale, RecordKind, Status, validation::ValidationErrors,
  validation::FieldMessage,
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("validation failed")]
  Invalid(Vec<FieldMessage>),

  /// The underlying failure is logged; only `message` reaches the client.
  #[error("store error: {source}")]
  Store {
    message: &'static str,
    #[source]
    source:  Box<dyn std::error::Error + Send + Sync>,
  },
}

impl ApiError {
  pub fn invalid(errors: &ValidationErrors, locale: Locale) -> Self {
    Self::Invalid(errors.messages(locale))
  }

  /// Log a store failure for `kind` and wrap it with the generic message.
  pub fn store<E>(kind: RecordKind, locale: Locale) -> impl FnOnce(E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    move |e| {
      tracing::error!(%kind, error = %e, "store operation failed");
      Self::Store {
        message: Status::Failed.message(locale),
        source:  Box::new(e),
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::NotFound(m) => {
        (StatusCode::NOT_FOUND, Json(json!({ "error": m }))).into_response()
      }
      ApiError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": m }))).into_response()
      }
      ApiError::Invalid(fields) => (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "error": "validation failed", "fields": fields })),
      )
        .into_response(),
      ApiError::Store { message, .. } => (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
      )
        .into_response(),
    }
  }
}
