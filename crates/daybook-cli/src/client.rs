//! Async HTTP client wrapping the daybook JSON API.

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use daybook_core::{
  Expense, Journal, Meal, Stored,
  payload::{ExpenseBody, JournalBody, MealBody, SaveResponse},
  record::DATE_FORMAT,
};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Connection settings for the daybook API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// Async HTTP client for the daybook JSON REST API.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

fn day(date: NaiveDate) -> String { date.format(DATE_FORMAT).to_string() }

/// Turn a non-success response into an error carrying the server's
/// `{"error": …}` text when there is one.
async fn check(resp: Response, what: &str) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let detail = resp
    .json::<serde_json::Value>()
    .await
    .ok()
    .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_owned))
    .unwrap_or_default();
  Err(anyhow!("{what} → {status} {detail}"))
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  async fn put<B, R>(&self, path: String, body: &B) -> Result<SaveResponse<R>>
  where
    B: serde::Serialize,
    R: DeserializeOwned,
  {
    let what = format!("PUT {path}");
    let resp = self
      .auth(self.client.put(self.url(&path)))
      .json(body)
      .send()
      .await
      .with_context(|| format!("{what} failed"))?;
    check(resp, &what)
      .await?
      .json()
      .await
      .context("deserialising save response")
  }

  // ── Expenses ──────────────────────────────────────────────────────────────

  /// `PUT /api/expenses/{date}`: the server derives the total.
  pub async fn save_expense(&self, expense: &Expense) -> Result<SaveResponse<Expense>> {
    let body = ExpenseBody { items: expense.items.clone() };
    self.put(format!("/expenses/{}", day(expense.date)), &body).await
  }

  // ── Meals ─────────────────────────────────────────────────────────────────

  /// `PUT /api/meals/{date}/{meal_type}`
  pub async fn save_meal(&self, meal: &Meal) -> Result<SaveResponse<Meal>> {
    let body = MealBody::new(meal);
    let path = format!("/meals/{}/{}", day(meal.date), meal.meal_type.as_str());
    self.put(path, &body).await
  }

  // ── Journals ──────────────────────────────────────────────────────────────

  /// `GET /api/journals/{date}`: `None` when nothing is stored for the day.
  pub async fn get_journal(&self, date: NaiveDate) -> Result<Option<Journal>> {
    let path = format!("/journals/{}", day(date));
    let resp = self
      .auth(self.client.get(self.url(&path)))
      .send()
      .await
      .with_context(|| format!("GET {path} failed"))?;

    if resp.status() == StatusCode::NOT_FOUND {
      return Ok(None);
    }
    let stored: Stored<Journal> = check(resp, &format!("GET {path}"))
      .await?
      .json()
      .await
      .context("deserialising journal")?;
    Ok(Some(stored.record))
  }

  /// `PUT /api/journals/{date}`
  pub async fn save_journal(&self, journal: &Journal) -> Result<SaveResponse<Journal>> {
    let body = JournalBody { content: journal.content.clone() };
    self.put(format!("/journals/{}", day(journal.date)), &body).await
  }
}
