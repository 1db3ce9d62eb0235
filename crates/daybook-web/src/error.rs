//! Error types and axum `IntoResponse` implementation.

use axum::{
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use daybook_core::{Locale, RecordKind, Status};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized")]
  Unauthorized,
  #[error("bad request: {0}")]
  BadRequest(String),
  #[error("invalid configuration: {0}")]
  Config(String),
  /// The underlying failure is logged; only `message` reaches the client.
  #[error("store error: {source}")]
  Store {
    message: &'static str,
    #[source]
    source:  Box<dyn std::error::Error + Send + Sync>,
  },
}

impl Error {
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

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Unauthorized => {
        let mut res =
          (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"daybook\""),
        );
        res
      }
      Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
      Error::Config(msg) => {
        (StatusCode::INTERNAL_SERVER_ERROR, msg).into_response()
      }
      Error::Store { message, .. } => {
        (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
      }
    }
  }
}
