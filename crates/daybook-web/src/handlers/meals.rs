//! `GET /meals` and `POST /meals`.

use axum::{
  Form,
  extract::{Query, State},
  http::StatusCode,
  response::{Html, IntoResponse, Response},
};
use chrono::NaiveDate;
use daybook_core::{
  DateRange, DaybookStore, Locale, Meal, MealType, RecordKind, RecordStore,
  Status, Stored,
  form::MealForm,
  record::parse_date,
  validation::{Field, ValidationErrors},
};

use super::{DateQuery, field};
use crate::{AppState, error::Error, html};

/// Everything the meal page shows besides the form itself.
struct Day {
  date:  NaiveDate,
  meals: Vec<Stored<Meal>>,
}

async fn load_day<S>(state: &AppState<S>, date: NaiveDate) -> Result<Day, Error>
where
  S: DaybookStore + 'static,
{
  let meals = RecordStore::<Meal>::list(&*state.store, DateRange::day(date))
    .await
    .map_err(Error::store(RecordKind::Meal, state.locale()))?;
  Ok(Day { date, meals })
}

// ─── Handlers ────────────────────────────────────────────────────────────────

/// `GET /meals[?date=YYYY-MM-DD]`: a blank form plus that day's meals.
pub async fn show<S>(
  State(state): State<AppState<S>>,
  Query(query): Query<DateQuery>,
) -> Result<Html<String>, Error>
where
  S: DaybookStore + 'static,
{
  let date = query.resolve()?;
  let day = load_day(&state, date).await?;
  Ok(render(state.locale(), &MealForm::new(date), None, None, Some(&day)))
}

/// `POST /meals`
pub async fn submit<S>(
  State(state): State<AppState<S>>,
  Form(fields): Form<Vec<(String, String)>>,
) -> Result<Response, Error>
where
  S: DaybookStore + 'static,
{
  let locale = state.locale();
  let form = MealForm {
    date:      field(&fields, "date"),
    meal_type: field(&fields, "meal_type"),
    content:   field(&fields, "content"),
    calories:  field(&fields, "calories"),
  };

  let meal = match form.validate() {
    Ok(meal) => meal,
    Err(errors) => {
      // The day list is best-effort context here; skip it if the date is bad.
      let day = match parse_date(&form.date) {
        Ok(date) => load_day(&state, date).await.ok(),
        Err(_) => None,
      };
      let page = render(locale, &form, Some(&errors), None, day.as_ref());
      return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
    }
  };

  let (date, meal_type) = (meal.date, meal.meal_type);
  match RecordStore::<Meal>::upsert(&*state.store, meal).await {
    Ok(saved) => {
      tracing::info!(kind = "meal", %date, %meal_type, outcome = ?saved.outcome, "saved");
      let form = MealForm::from_meal(&saved.stored.record);
      // Already stored; a failed listing must not turn this into an error.
      let day = load_day(&state, date).await.ok();
      let status = Status::from(saved.outcome);
      Ok(render(locale, &form, None, Some(status), day.as_ref()).into_response())
    }
    Err(e) => {
      tracing::error!(kind = "meal", %date, %meal_type, error = %e, "store operation failed");
      let page = render(locale, &form, None, Some(Status::Failed), None);
      Ok((StatusCode::INTERNAL_SERVER_ERROR, page).into_response())
    }
  }
}

// ─── Rendering ───────────────────────────────────────────────────────────────

fn render(
  locale: Locale,
  form: &MealForm,
  errors: Option<&ValidationErrors>,
  status: Option<Status>,
  day: Option<&Day>,
) -> Html<String> {
  let selected = form.meal_type.parse::<MealType>().ok();
  let options: String = MealType::ALL
    .iter()
    .map(|t| {
      format!(
        "<option value=\"{}\"{}>{}</option>",
        t.as_str(),
        if selected == Some(*t) { " selected" } else { "" },
        t.label(locale),
      )
    })
    .collect();

  let mut body = format!(
    "{status}<form method=\"post\" action=\"/meals\">\n\
     <label>{date_label} <input type=\"date\" name=\"date\" value=\"{date}\"></label>{date_err}\n\
     <label>{type_label} <select name=\"meal_type\"><option value=\"\"></option>{options}</select></label>{type_err}\n\
     <label>{content_label} <textarea name=\"content\">{content}</textarea></label>{content_err}\n\
     <label>{calories_label} <input name=\"calories\" inputmode=\"numeric\" value=\"{calories}\"></label>{calories_err}\n\
     <button type=\"submit\">{save}</button>\n</form>\n",
    status = html::status_banner(status, locale),
    date_label = html::tr(locale, "Date", "日付"),
    date = html::escape(&form.date),
    date_err = html::field_error(errors, Field::Date, locale),
    type_label = html::tr(locale, "Meal", "食事タイプ"),
    type_err = html::field_error(errors, Field::MealType, locale),
    content_label = html::tr(locale, "What you ate", "内容"),
    content = html::escape(&form.content),
    content_err = html::field_error(errors, Field::Content, locale),
    calories_label = html::tr(locale, "Calories", "カロリー"),
    calories = html::escape(&form.calories),
    calories_err = html::field_error(errors, Field::Calories, locale),
    save = html::tr(locale, "Save", "保存"),
  );

  if let Some(day) = day {
    body.push_str(&day_summary(locale, day));
  }
  html::page(locale, html::tr(locale, "Meals", "食事"), &body)
}

fn day_summary(locale: Locale, day: &Day) -> String {
  if day.meals.is_empty() {
    return format!(
      "<p>{} {}</p>\n",
      day.date,
      html::tr(locale, "has no meals yet.", "の食事はまだありません。"),
    );
  }
  let rows: String = day
    .meals
    .iter()
    .map(|m| {
      format!(
        "<li>{}: {} ({} kcal)</li>\n",
        m.record.meal_type.label(locale),
        html::escape(&m.record.content),
        m.record.calories,
      )
    })
    .collect();
  let total: i64 = day.meals.iter().map(|m| m.record.calories).sum();
  format!(
    "<section>\n<h2>{date}</h2>\n<ul>\n{rows}</ul>\n<p>{label}: {total} kcal</p>\n</section>\n",
    date = day.date,
    label = html::tr(locale, "Total", "合計"),
  )
}
