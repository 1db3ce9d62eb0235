//! Server-rendered HTML front end for Daybook.
//!
//! Exposes an axum [`Router`] serving the expense, meal and journal forms
//! backed by any [`DaybookStore`], with the JSON API nested under `/api`.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod html;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, middleware, routing::get};
use daybook_core::{DaybookStore, Locale};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use auth::{AuthConfig, require_auth};
use handlers::{expenses, index, journal, meals};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `DAYBOOK_*` environment variables. Every key is optional.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:               String,
  #[serde(default = "default_port")]
  pub port:               u16,
  #[serde(default = "default_store_path")]
  pub store_path:         PathBuf,
  #[serde(default)]
  pub locale:             Locale,
  #[serde(default)]
  pub auth_username:      Option<String>,
  #[serde(default)]
  pub auth_password_hash: Option<String>,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/daybook/daybook.db") }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:               default_host(),
      port:               default_port(),
      store_path:         default_store_path(),
      locale:             Locale::default(),
      auth_username:      None,
      auth_password_hash: None,
    }
  }
}

impl ServerConfig {
  /// Basic-auth credentials, if configured. Setting only one of the two keys
  /// is a configuration error rather than silently disabling auth.
  pub fn auth_config(&self) -> Result<Option<AuthConfig>, Error> {
    match (&self.auth_username, &self.auth_password_hash) {
      (Some(username), Some(password_hash)) => Ok(Some(AuthConfig {
        username:      username.clone(),
        password_hash: password_hash.clone(),
      })),
      (None, None) => Ok(None),
      _ => Err(Error::Config(
        "auth_username and auth_password_hash must be set together".to_string(),
      )),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all page handlers.
pub struct AppState<S> {
  pub store:  Arc<S>,
  pub config: Arc<ServerConfig>,
  pub auth:   Option<Arc<AuthConfig>>,
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:  Arc::clone(&self.store),
      config: Arc::clone(&self.config),
      auth:   self.auth.clone(),
    }
  }
}

impl<S> AppState<S> {
  pub fn locale(&self) -> Locale { self.config.locale }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application: HTML pages, the JSON API under `/api`,
/// optional Basic auth over both, and request tracing.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: DaybookStore + 'static,
{
  let api = daybook_api::api_router(Arc::clone(&state.store), state.locale());
  let auth = state.auth.clone();

  let app = Router::new()
    .route("/",         get(index::handler::<S>))
    .route("/expenses", get(expenses::show::<S>).post(expenses::submit::<S>))
    .route("/meals",    get(meals::show::<S>).post(meals::submit::<S>))
    .route("/journal",  get(journal::show::<S>).post(journal::submit::<S>))
    .with_state(state)
    .nest("/api", api);

  let app = match auth {
    Some(config) => app.layer(middleware::from_fn_with_state(config, require_auth)),
    None => app,
  };
  app.layer(TraceLayer::new_for_http())
}

// ─── Integration tests ────────────────────────────────────────────────────────
