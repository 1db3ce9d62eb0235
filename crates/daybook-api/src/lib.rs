//! JSON REST API for Daybook.
//!
//! Exposes an axum [`Router`] backed by any [`daybook_core::DaybookStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", daybook_api::api_router(store.clone(), Locale::En))
//! ```

pub mod error;
pub mod expenses;
pub mod journals;
pub mod meals;
mod records;

use std::sync::Arc;

use axum::{Router, routing::get};
use daybook_core::{DaybookStore, Locale};

pub use error::ApiError;

/// State shared by every API handler.
pub struct ApiState<S> {
  pub store:  Arc<S>,
  /// Language of status and validation messages in responses.
  pub locale: Locale,
}

// Manual impl: `S` itself need not be `Clone`.
impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), locale: self.locale }
  }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, locale: Locale) -> Router<()>
where
  S: DaybookStore + 'static,
{
  Router::new()
    // Expenses
    .route("/expenses", get(expenses::list::<S>))
    .route(
      "/expenses/{date}",
      get(expenses::get_one::<S>).put(expenses::save::<S>),
    )
    // Meals
    .route("/meals", get(meals::list::<S>))
    .route(
      "/meals/{date}/{meal_type}",
      get(meals::get_one::<S>).put(meals::save::<S>),
    )
    // Journals
    .route("/journals", get(journals::list::<S>))
    .route(
      "/journals/{date}",
      get(journals::get_one::<S>).put(journals::save::<S>),
    )
    .with_state(ApiState { store, locale })
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use super::*;

  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use daybook_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  async fn app(locale: Locale) -> Router {
    let store = SqliteStore::open_in_memory().await.unwrap();
    api_router(Arc::new(store), locale)
  }

  async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
      Some(json) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(json.to_string())
      }
      None => Body::empty(),
    };
    let resp = app
      .clone()
      .oneshot(builder.body(body).unwrap())
      .await
      .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  // ── Expenses ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn expense_put_creates_then_updates() {
    let app = app(Locale::En).await;

    let (status, body) = call(
      &app,
      "PUT",
      "/expenses/2024-01-01",
      Some(json!({ "items": [{ "name": "lunch", "amount": 1200.0 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["outcome"], "created");
    assert_eq!(body["message"], "Saved.");
    assert_eq!(body["record"]["total"], 1200.0);
    let id = body["record"]["id"].clone();

    let (status, body) = call(
      &app,
      "PUT",
      "/expenses/2024-01-01",
      Some(json!({ "items": [
        { "name": "lunch", "amount": 1200.0 },
        { "name": "coffee", "amount": 400.0 },
      ] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "updated");
    assert_eq!(body["message"], "Updated.");
    assert_eq!(body["record"]["total"], 1600.0);
    assert_eq!(body["record"]["id"], id);

    let (status, list) = call(&app, "GET", "/expenses", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn expense_total_in_body_is_ignored() {
    let app = app(Locale::En).await;
    let (status, body) = call(
      &app,
      "PUT",
      "/expenses/2024-02-02",
      Some(json!({
        "items": [{ "name": "bread", "amount": 250.0 }],
        "total": 99999.0,
      })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["record"]["total"], 250.0);
  }

  #[tokio::test]
  async fn expense_with_no_items_is_422() {
    let app = app(Locale::En).await;
    let (status, body) = call(
      &app,
      "PUT",
      "/expenses/2024-01-01",
      Some(json!({ "items": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"][0]["field"], "items");
  }

  #[tokio::test]
  async fn get_missing_expense_is_404() {
    let app = app(Locale::En).await;
    let (status, body) = call(&app, "GET", "/expenses/2030-01-01", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
  }

  #[tokio::test]
  async fn malformed_date_is_400() {
    let app = app(Locale::En).await;
    let (status, _) = call(&app, "GET", "/expenses/not-a-date", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn expense_total_overflow_is_422() {
    let app = app(Locale::En).await;
    let (status, body) = call(
      &app,
      "PUT",
      "/expenses/2024-01-01",
      Some(json!({ "items": [
        { "name": "house", "amount": 1e308 },
        { "name": "yacht", "amount": 1e308 }
      ] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"][0]["field"], "items");

    let (status, _) = call(&app, "GET", "/expenses/2024-01-01", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Meals ──────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn meal_resubmission_updates_and_lists_once() {
    let app = app(Locale::En).await;
    let body = json!({ "content": "toast", "calories": 300 });

    let (first, _) =
      call(&app, "PUT", "/meals/2024-01-01/breakfast", Some(body.clone())).await;
    let (second, saved) =
      call(&app, "PUT", "/meals/2024-01-01/Breakfast", Some(body)).await;
    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::OK);
    assert_eq!(saved["record"]["meal_type"], "breakfast");

    let (status, list) =
      call(&app, "GET", "/meals?from=2024-01-01&to=2024-01-01", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, one) =
      call(&app, "GET", "/meals/2024-01-01/breakfast", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(one["calories"], 300);
  }

  #[tokio::test]
  async fn unknown_meal_type_is_400() {
    let app = app(Locale::En).await;
    let (status, _) = call(
      &app,
      "PUT",
      "/meals/2024-01-01/brunch",
      Some(json!({ "content": "eggs", "calories": 400 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn meal_fractional_calories_is_422_with_field() {
    let app = app(Locale::En).await;
    let (status, body) = call(
      &app,
      "PUT",
      "/meals/2024-01-01/lunch",
      Some(json!({ "content": "x", "calories": 12.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"][0]["field"], "calories");
    assert_eq!(body["fields"][0]["message"], "Calories must be a whole number");

    let (status, _) = call(&app, "GET", "/meals/2024-01-01/lunch", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  // ── Journals ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn journal_too_long_is_422_with_field() {
    let app = app(Locale::En).await;
    let (status, body) = call(
      &app,
      "PUT",
      "/journals/2024-01-01",
      Some(json!({ "content": "x".repeat(1001) })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"][0]["field"], "content");
  }

  #[tokio::test]
  async fn journal_messages_follow_locale() {
    let app = app(Locale::Ja).await;
    let (status, body) = call(
      &app,
      "PUT",
      "/journals/2024-01-01",
      Some(json!({ "content": "今日は晴れ" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "保存しました");

    let (status, found) = call(&app, "GET", "/journals/2024-01-01", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["content"], "今日は晴れ");
  }
}
