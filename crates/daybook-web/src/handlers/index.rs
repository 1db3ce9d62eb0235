//! `GET /`: today at a glance.

use axum::{
  extract::State,
  response::Html,
};
use daybook_core::{
  DateRange, DaybookStore, Expense, Journal, Meal, RecordKind, RecordStore,
};

use super::today;
use crate::{AppState, error::Error, html};

pub async fn handler<S>(State(state): State<AppState<S>>) -> Result<Html<String>, Error>
where
  S: DaybookStore + 'static,
{
  let locale = state.locale();
  let date = today();

  let expense = RecordStore::<Expense>::find(&*state.store, date)
    .await
    .map_err(Error::store(RecordKind::Expense, locale))?;
  let meals = RecordStore::<Meal>::list(&*state.store, DateRange::day(date))
    .await
    .map_err(Error::store(RecordKind::Meal, locale))?;
  let journal = RecordStore::<Journal>::find(&*state.store, date)
    .await
    .map_err(Error::store(RecordKind::Journal, locale))?;

  let spent = expense.map(|e| e.record.total).unwrap_or(0.0);
  let calories: i64 = meals.iter().map(|m| m.record.calories).sum();

  let body = format!(
    "<p>{date}</p>\n<ul>\n\
     <li><a href=\"/expenses\">{spent_label}</a>: {spent}</li>\n\
     <li><a href=\"/meals\">{meals_label}</a>: {count} ({calories} kcal)</li>\n\
     <li><a href=\"/journal\">{journal_label}</a>: {journal}</li>\n</ul>\n",
    spent_label = html::tr(locale, "Spent", "支出"),
    spent = html::number(spent),
    meals_label = html::tr(locale, "Meals", "食事"),
    count = meals.len(),
    journal_label = html::tr(locale, "Journal", "日記"),
    journal = match journal {
      Some(_) => html::tr(locale, "written", "記入済み"),
      None => html::tr(locale, "not yet", "未記入"),
    },
  );
  Ok(html::page(locale, html::tr(locale, "Today", "今日"), &body))
}
