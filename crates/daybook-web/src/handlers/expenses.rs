//! `GET /expenses` and `POST /expenses`.
//!
//! The form posts repeated `item_name` / `item_amount` pairs in row order and
//! an `action`: `save`, `add`, or `remove-N`. Only `save` touches the store.

use axum::{
  Form,
  extract::{Query, State},
  http::StatusCode,
  response::{Html, IntoResponse, Response},
};
use daybook_core::{
  DaybookStore, Expense, Locale, RecordStore, Status,
  form::{ExpenseForm, ExpenseItemForm},
  validation::{Field, ValidationErrors},
};

use super::{DateQuery, field};
use crate::{AppState, error::Error, html};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
  Save,
  Add,
  Remove(usize),
}

impl Action {
  fn parse(raw: &str) -> Result<Self, Error> {
    match raw.trim() {
      // Implicit submission (Enter in a text box) sends no action.
      "" | "save" => Ok(Self::Save),
      "add" => Ok(Self::Add),
      other => other
        .strip_prefix("remove-")
        .and_then(|n| n.parse().ok())
        .map(Self::Remove)
        .ok_or_else(|| Error::BadRequest(format!("unknown action {other:?}"))),
    }
  }
}

fn parse_submission(fields: &[(String, String)]) -> Result<(ExpenseForm, Action), Error> {
  let values = |key: &str| -> Vec<String> {
    fields
      .iter()
      .filter(|(k, _)| k == key)
      .map(|(_, v)| v.clone())
      .collect()
  };
  let names = values("item_name");
  let amounts = values("item_amount");
  let rows = names.len().max(amounts.len());

  let items = (0..rows)
    .map(|i| ExpenseItemForm {
      name:   names.get(i).cloned().unwrap_or_default(),
      amount: amounts.get(i).cloned().unwrap_or_default(),
    })
    .collect();

  let form = ExpenseForm { date: field(fields, "date"), items };
  Ok((form, Action::parse(&field(fields, "action"))?))
}

// ─── Handlers ────────────────────────────────────────────────────────────────

/// `GET /expenses[?date=YYYY-MM-DD]`: a blank form with one item row.
pub async fn show<S>(
  State(state): State<AppState<S>>,
  Query(query): Query<DateQuery>,
) -> Result<Html<String>, Error>
where
  S: DaybookStore + 'static,
{
  let form = ExpenseForm::new(query.resolve()?);
  Ok(render(state.locale(), &form, None, None))
}

/// `POST /expenses`
pub async fn submit<S>(
  State(state): State<AppState<S>>,
  Form(fields): Form<Vec<(String, String)>>,
) -> Result<Response, Error>
where
  S: DaybookStore + 'static,
{
  let locale = state.locale();
  let (mut form, action) = parse_submission(&fields)?;

  match action {
    Action::Add => {
      form.add_item();
      return Ok(render(locale, &form, None, None).into_response());
    }
    Action::Remove(index) => {
      form.remove_item(index);
      return Ok(render(locale, &form, None, None).into_response());
    }
    Action::Save => {}
  }

  let expense = match form.validate() {
    Ok(expense) => expense,
    Err(errors) => {
      let page = render(locale, &form, Some(&errors), None);
      return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
    }
  };

  let date = expense.date;
  match RecordStore::<Expense>::upsert(&*state.store, expense).await {
    Ok(saved) => {
      tracing::info!(kind = "expense", %date, outcome = ?saved.outcome, total = saved.stored.record.total, "saved");
      let form = ExpenseForm::from_expense(&saved.stored.record);
      let status = Status::from(saved.outcome);
      Ok(render(locale, &form, None, Some(status)).into_response())
    }
    Err(e) => {
      tracing::error!(kind = "expense", %date, error = %e, "store operation failed");
      let page = render(locale, &form, None, Some(Status::Failed));
      Ok((StatusCode::INTERNAL_SERVER_ERROR, page).into_response())
    }
  }
}

// ─── Rendering ───────────────────────────────────────────────────────────────

fn render(
  locale: Locale,
  form: &ExpenseForm,
  errors: Option<&ValidationErrors>,
  status: Option<Status>,
) -> Html<String> {
  let mut rows = String::new();
  for (i, item) in form.items.iter().enumerate() {
    rows.push_str(&format!(
      "<tr>\
       <td><input name=\"item_name\" value=\"{name}\">{name_err}</td>\
       <td><input name=\"item_amount\" inputmode=\"decimal\" value=\"{amount}\">{amount_err}</td>\
       <td><button name=\"action\" value=\"remove-{i}\">{remove}</button></td>\
       </tr>\n",
      name = html::escape(&item.name),
      name_err = html::field_error(errors, Field::ItemName(i), locale),
      amount = html::escape(&item.amount),
      amount_err = html::field_error(errors, Field::ItemAmount(i), locale),
      remove = html::tr(locale, "Remove", "削除"),
    ));
  }

  let body = format!(
    "{status}<form method=\"post\" action=\"/expenses\">\n\
     <label>{date_label} <input type=\"date\" name=\"date\" value=\"{date}\"></label>{date_err}\n\
     <table>\n<thead><tr><th>{name_h}</th><th>{amount_h}</th><th></th></tr></thead>\n\
     <tbody>\n{rows}</tbody>\n</table>{items_err}\n\
     <p>{total_label}: <output>{total}</output></p>\n\
     <button name=\"action\" value=\"add\">{add}</button>\n\
     <button name=\"action\" value=\"save\">{save}</button>\n</form>\n",
    status = html::status_banner(status, locale),
    date_label = html::tr(locale, "Date", "日付"),
    date = html::escape(&form.date),
    date_err = html::field_error(errors, Field::Date, locale),
    name_h = html::tr(locale, "Item", "項目名"),
    amount_h = html::tr(locale, "Amount", "金額"),
    items_err = html::field_error(errors, Field::Items, locale),
    total_label = html::tr(locale, "Total", "合計"),
    total = html::number(form.total_preview()),
    add = html::tr(locale, "Add item", "項目を追加"),
    save = html::tr(locale, "Save", "保存"),
  );
  html::page(locale, html::tr(locale, "Expenses", "支出"), &body)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
    raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
  }

  #[test]
  fn actions_parse() {
    assert_eq!(Action::parse("save").unwrap(), Action::Save);
    assert_eq!(Action::parse("").unwrap(), Action::Save);
    assert_eq!(Action::parse("add").unwrap(), Action::Add);
    assert_eq!(Action::parse("remove-3").unwrap(), Action::Remove(3));
    assert!(Action::parse("remove-x").is_err());
  }

  #[test]
  fn rows_pair_up_in_order() {
    let (form, action) = parse_submission(&pairs(&[
      ("date", "2024-01-01"),
      ("item_name", "lunch"),
      ("item_amount", "1200"),
      ("item_name", "coffee"),
      ("item_amount", "400"),
      ("action", "save"),
    ]))
    .unwrap();
    assert_eq!(action, Action::Save);
    assert_eq!(form.items.len(), 2);
    assert_eq!(form.items[1].name, "coffee");
    assert_eq!(form.items[1].amount, "400");
  }

  #[test]
  fn unmatched_rows_are_padded() {
    let (form, _) = parse_submission(&pairs(&[
      ("item_name", "lunch"),
      ("item_name", "coffee"),
      ("item_amount", "1200"),
    ]))
    .unwrap();
    assert_eq!(form.items.len(), 2);
    assert_eq!(form.items[1].amount, "");
  }
}
