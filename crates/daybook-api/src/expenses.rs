//! Handlers for `/expenses` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/expenses` | Optional `?from=YYYY-MM-DD&to=YYYY-MM-DD` |
//! | `GET`  | `/expenses/{date}` | 404 if none |
//! | `PUT`  | `/expenses/{date}` | Body: [`ExpenseBody`]; 201 created, 200 updated |

use axum::{
  Json,
  extract::{Path, Query, State},
  response::Response,
};
use daybook_core::{DateRange, Expense, Stored, payload::ExpenseBody};

use crate::{ApiState, error::ApiError, records};

/// `GET /expenses[?from=…][&to=…]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Query(range): Query<DateRange>,
) -> Result<Json<Vec<Stored<Expense>>>, ApiError>
where
  S: daybook_core::DaybookStore + 'static,
{
  records::list::<S, Expense>(&state, range).await
}

/// `GET /expenses/{date}`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(date): Path<String>,
) -> Result<Json<Stored<Expense>>, ApiError>
where
  S: daybook_core::DaybookStore + 'static,
{
  let date = records::path_date(&date)?;
  records::find::<S, Expense>(&state, date).await
}

/// `PUT /expenses/{date}`: the total is always derived from `items`.
pub async fn save<S>(
  State(state): State<ApiState<S>>,
  Path(date): Path<String>,
  Json(body): Json<ExpenseBody>,
) -> Result<Response, ApiError>
where
  S: daybook_core::DaybookStore + 'static,
{
  let date = records::path_date(&date)?;
  let expense = body
    .into_record(date)
    .map_err(|e| ApiError::invalid(&e, state.locale))?;
  records::save(&state, expense).await
}
