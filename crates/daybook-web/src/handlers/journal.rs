//! `GET /journal` and `POST /journal`.
//!
//! Picking a date re-requests the page with `?date=`, which re-queries the
//! store and pre-fills the entry for that day or leaves it empty.

use axum::{
  Form,
  extract::{Query, State},
  http::StatusCode,
  response::{Html, IntoResponse, Response},
};
use daybook_core::{
  DaybookStore, Journal, Locale, RecordKind, RecordStore, Status,
  form::JournalForm,
  validation::{Field, JOURNAL_MAX_CHARS, ValidationErrors},
};

use super::{DateQuery, field};
use crate::{AppState, error::Error, html};

/// `GET /journal[?date=YYYY-MM-DD]`
pub async fn show<S>(
  State(state): State<AppState<S>>,
  Query(query): Query<DateQuery>,
) -> Result<Html<String>, Error>
where
  S: DaybookStore + 'static,
{
  let date = query.resolve()?;
  let existing = RecordStore::<Journal>::find(&*state.store, date)
    .await
    .map_err(Error::store(RecordKind::Journal, state.locale()))?;
  tracing::debug!(%date, found = existing.is_some(), "journal pre-fill");

  let form = JournalForm::for_date(date, existing.as_ref().map(|s| &s.record));
  Ok(render(state.locale(), &form, None, None))
}

/// `POST /journal`
pub async fn submit<S>(
  State(state): State<AppState<S>>,
  Form(fields): Form<Vec<(String, String)>>,
) -> Result<Response, Error>
where
  S: DaybookStore + 'static,
{
  let locale = state.locale();
  let form = JournalForm {
    date:    field(&fields, "date"),
    content: field(&fields, "content"),
    exists:  field(&fields, "exists") == "true",
  };

  let journal = match form.validate() {
    Ok(journal) => journal,
    Err(errors) => {
      let page = render(locale, &form, Some(&errors), None);
      return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
    }
  };

  let date = journal.date;
  match RecordStore::<Journal>::upsert(&*state.store, journal).await {
    Ok(saved) => {
      tracing::info!(kind = "journal", %date, outcome = ?saved.outcome, "saved");
      let form = JournalForm::for_date(date, Some(&saved.stored.record));
      Ok(render(locale, &form, None, Some(Status::from(saved.outcome))).into_response())
    }
    Err(e) => {
      tracing::error!(kind = "journal", %date, error = %e, "store operation failed");
      let page = render(locale, &form, None, Some(Status::Failed));
      Ok((StatusCode::INTERNAL_SERVER_ERROR, page).into_response())
    }
  }
}

fn render(
  locale: Locale,
  form: &JournalForm,
  errors: Option<&ValidationErrors>,
  status: Option<Status>,
) -> Html<String> {
  let body = format!(
    "{status}<form method=\"get\" action=\"/journal\">\n\
     <label>{date_label} <input type=\"date\" name=\"date\" value=\"{date}\"></label>\n\
     <button type=\"submit\">{open}</button>\n</form>\n\
     <p class=\"entry-state\">{entry_state}</p>\n\
     <form method=\"post\" action=\"/journal\">\n\
     <input type=\"hidden\" name=\"date\" value=\"{date}\">{date_err}\n\
     <input type=\"hidden\" name=\"exists\" value=\"{exists}\">\n\
     <textarea name=\"content\" rows=\"12\" maxlength=\"{max}\">{content}</textarea>{content_err}\n\
     <p><small>{count} / {max}</small></p>\n\
     <button type=\"submit\">{save}</button>\n</form>\n",
    status = html::status_banner(status, locale),
    date_label = html::tr(locale, "Date", "日付"),
    date = html::escape(&form.date),
    open = html::tr(locale, "Open", "開く"),
    entry_state = if form.exists {
      html::tr(locale, "Editing", "編集中")
    } else {
      html::tr(locale, "New entry", "新規")
    },
    date_err = html::field_error(errors, Field::Date, locale),
    exists = form.exists,
    max = JOURNAL_MAX_CHARS,
    content = html::escape(&form.content),
    content_err = html::field_error(errors, Field::Content, locale),
    count = form.content.chars().count(),
    save = html::tr(locale, "Save", "保存"),
  );
  html::page(locale, html::tr(locale, "Journal", "日記"), &body)
}
