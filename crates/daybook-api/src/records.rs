//! Slice-independent handler bodies: lookup, upsert and listing for any
//! [`Record`] type. The per-slice modules only parse paths and bodies.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use daybook_core::{
  DateRange, Record, RecordStore, Status, Stored, UpsertOutcome,
  payload::SaveResponse, record::parse_date,
};

use crate::{ApiState, error::ApiError};

pub(crate) fn path_date(raw: &str) -> Result<NaiveDate, ApiError> {
  parse_date(raw).map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// Point lookup; a missing record is a 404.
pub(crate) async fn find<S, R>(
  state: &ApiState<S>,
  key: R::Key,
) -> Result<Json<Stored<R>>, ApiError>
where
  S: RecordStore<R>,
  R: Record,
{
  let described = format!("{key:?}");
  RecordStore::<R>::find(&*state.store, key)
    .await
    .map_err(ApiError::store(R::KIND, state.locale))?
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("no {} for {described}", R::KIND)))
}

/// Upsert and answer 201 (created) or 200 (updated) with the status line.
pub(crate) async fn save<S, R>(
  state: &ApiState<S>,
  record: R,
) -> Result<Response, ApiError>
where
  S: RecordStore<R>,
  R: Record,
{
  let key = record.key();
  let saved = RecordStore::<R>::upsert(&*state.store, record)
    .await
    .map_err(ApiError::store(R::KIND, state.locale))?;

  tracing::info!(kind = %R::KIND, ?key, outcome = ?saved.outcome, "saved via api");

  let status = match saved.outcome {
    UpsertOutcome::Created => StatusCode::CREATED,
    UpsertOutcome::Updated => StatusCode::OK,
  };
  let body = SaveResponse {
    outcome: saved.outcome,
    message: Status::from(saved.outcome).message(state.locale).to_owned(),
    record:  saved.stored,
  };
  Ok((status, Json(body)).into_response())
}

pub(crate) async fn list<S, R>(
  state: &ApiState<S>,
  range: DateRange,
) -> Result<Json<Vec<Stored<R>>>, ApiError>
where
  S: RecordStore<R>,
  R: Record,
{
  let records = RecordStore::<R>::list(&*state.store, range)
    .await
    .map_err(ApiError::store(R::KIND, state.locale))?;
  Ok(Json(records))
}
