//! Handlers for `/meals` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/meals` | Optional `?from=…&to=…` |
//! | `GET`  | `/meals/{date}/{meal_type}` | 404 if none |
//! | `PUT`  | `/meals/{date}/{meal_type}` | Body: [`MealBody`] |

use axum::{
  Json,
  extract::{Path, Query, State},
  response::Response,
};
use daybook_core::{DateRange, Meal, MealType, Stored, payload::MealBody};

use crate::{ApiState, error::ApiError, records};

fn path_key(date: &str, meal_type: &str) -> Result<(chrono::NaiveDate, MealType), ApiError> {
  let date = records::path_date(date)?;
  let meal_type = meal_type
    .parse::<MealType>()
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
  Ok((date, meal_type))
}

/// `GET /meals[?from=…][&to=…]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Query(range): Query<DateRange>,
) -> Result<Json<Vec<Stored<Meal>>>, ApiError>
where
  S: daybook_core::DaybookStore + 'static,
{
  records::list::<S, Meal>(&state, range).await
}

/// `GET /meals/{date}/{meal_type}`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path((date, meal_type)): Path<(String, String)>,
) -> Result<Json<Stored<Meal>>, ApiError>
where
  S: daybook_core::DaybookStore + 'static,
{
  let key = path_key(&date, &meal_type)?;
  records::find::<S, Meal>(&state, key).await
}

/// `PUT /meals/{date}/{meal_type}`
pub async fn save<S>(
  State(state): State<ApiState<S>>,
  Path((date, meal_type)): Path<(String, String)>,
  Json(body): Json<MealBody>,
) -> Result<Response, ApiError>
where
  S: daybook_core::DaybookStore + 'static,
{
  let (date, meal_type) = path_key(&date, &meal_type)?;
  let meal = body
    .into_record(date, meal_type)
    .map_err(|e| ApiError::invalid(&e, state.locale))?;
  records::save(&state, meal).await
}
