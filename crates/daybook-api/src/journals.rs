//! Handlers for `/journals` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/journals` | Optional `?from=…&to=…` |
//! | `GET`  | `/journals/{date}` | 404 if none; clients use this to pre-fill |
//! | `PUT`  | `/journals/{date}` | Body: [`JournalBody`] |

use axum::{
  Json,
  extract::{Path, Query, State},
  response::Response,
};
use daybook_core::{DateRange, Journal, Stored, payload::JournalBody};

use crate::{ApiState, error::ApiError, records};

/// `GET /journals[?from=…][&to=…]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Query(range): Query<DateRange>,
) -> Result<Json<Vec<Stored<Journal>>>, ApiError>
where
  S: daybook_core::DaybookStore + 'static,
{
  records::list::<S, Journal>(&state, range).await
}

/// `GET /journals/{date}`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(date): Path<String>,
) -> Result<Json<Stored<Journal>>, ApiError>
where
  S: daybook_core::DaybookStore + 'static,
{
  let date = records::path_date(&date)?;
  records::find::<S, Journal>(&state, date).await
}

/// `PUT /journals/{date}`
pub async fn save<S>(
  State(state): State<ApiState<S>>,
  Path(date): Path<String>,
  Json(body): Json<JournalBody>,
) -> Result<Response, ApiError>
where
  S: daybook_core::DaybookStore + 'static,
{
  let date = records::path_date(&date)?;
  let journal = body
    .into_record(date)
    .map_err(|e| ApiError::invalid(&e, state.locale))?;
  records::save(&state, journal).await
}
