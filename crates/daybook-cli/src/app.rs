//! Application state machine and event dispatcher.

use std::sync::Arc;

use chrono::{Days, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use daybook_core::{
  Journal, Locale, MealType, Status,
  form::{ExpenseForm, JournalForm, MealForm},
  record::{DATE_FORMAT, parse_date},
  validation::{Field, ValidationErrors},
};

use crate::{
  client::ApiClient,
  prefill::{Fetched, Prefill},
};

// ─── Tabs and focus ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
  Expenses,
  Meals,
  Journal,
}

impl Tab {
  pub const ALL: [Tab; 3] = [Tab::Expenses, Tab::Meals, Tab::Journal];

  pub fn title(self, locale: Locale) -> &'static str {
    match (self, locale) {
      (Tab::Expenses, Locale::En) => "Expenses",
      (Tab::Expenses, Locale::Ja) => "支出",
      (Tab::Meals, Locale::En) => "Meals",
      (Tab::Meals, Locale::Ja) => "食事",
      (Tab::Journal, Locale::En) => "Journal",
      (Tab::Journal, Locale::Ja) => "日記",
    }
  }

  pub fn index(self) -> usize {
    Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
  }
}

/// The input with keyboard focus on the Expenses tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseFocus {
  Date,
  Name(usize),
  Amount(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MealFocus {
  Date,
  MealType,
  Content,
  Calories,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalFocus {
  Date,
  Content,
}

// ─── Editors ──────────────────────────────────────────────────────────────────

pub struct ExpenseEditor {
  pub form:   ExpenseForm,
  pub focus:  ExpenseFocus,
  pub errors: Option<ValidationErrors>,
}

impl ExpenseEditor {
  fn order(&self) -> Vec<ExpenseFocus> {
    let mut order = vec![ExpenseFocus::Date];
    for i in 0..self.form.items.len() {
      order.push(ExpenseFocus::Name(i));
      order.push(ExpenseFocus::Amount(i));
    }
    order
  }

  fn step(&mut self, forward: bool) {
    let order = self.order();
    let pos = order.iter().position(|f| *f == self.focus).unwrap_or(0);
    self.focus = order[cycle(pos, order.len(), forward)];
  }

  fn text(&mut self) -> Option<&mut String> {
    match self.focus {
      ExpenseFocus::Date => Some(&mut self.form.date),
      ExpenseFocus::Name(i) => self.form.items.get_mut(i).map(|it| &mut it.name),
      ExpenseFocus::Amount(i) => self.form.items.get_mut(i).map(|it| &mut it.amount),
    }
  }

  /// The row under the cursor, if the cursor is on an item.
  pub fn focused_row(&self) -> Option<usize> {
    match self.focus {
      ExpenseFocus::Date => None,
      ExpenseFocus::Name(i) | ExpenseFocus::Amount(i) => Some(i),
    }
  }

  fn add_item(&mut self) {
    self.form.add_item();
    self.focus = ExpenseFocus::Name(self.form.items.len() - 1);
  }

  fn remove_focused(&mut self) {
    let Some(row) = self.focused_row() else { return };
    self.form.remove_item(row);
    self.focus = match self.form.items.len() {
      0 => ExpenseFocus::Date,
      len => ExpenseFocus::Name(row.min(len - 1)),
    };
  }
}

pub struct MealEditor {
  pub form:   MealForm,
  pub focus:  MealFocus,
  pub errors: Option<ValidationErrors>,
}

impl MealEditor {
  const ORDER: [MealFocus; 4] =
    [MealFocus::Date, MealFocus::MealType, MealFocus::Content, MealFocus::Calories];

  fn step(&mut self, forward: bool) {
    let pos = Self::ORDER.iter().position(|f| *f == self.focus).unwrap_or(0);
    self.focus = Self::ORDER[cycle(pos, Self::ORDER.len(), forward)];
  }

  fn text(&mut self) -> Option<&mut String> {
    match self.focus {
      MealFocus::Date => Some(&mut self.form.date),
      MealFocus::MealType => None,
      MealFocus::Content => Some(&mut self.form.content),
      MealFocus::Calories => Some(&mut self.form.calories),
    }
  }

  /// Move the meal-type selector; an empty or unknown value starts at the
  /// first entry.
  fn cycle_meal_type(&mut self, forward: bool) {
    let all = MealType::ALL;
    let next = match self.form.meal_type.parse::<MealType>() {
      Ok(current) => {
        let pos = all.iter().position(|t| *t == current).unwrap_or(0);
        all[cycle(pos, all.len(), forward)]
      }
      Err(_) => all[0],
    };
    self.form.meal_type = next.as_str().to_owned();
  }
}

pub struct JournalEditor {
  pub form:   JournalForm,
  pub focus:  JournalFocus,
  pub errors: Option<ValidationErrors>,
}

impl JournalEditor {
  fn text(&mut self) -> &mut String {
    match self.focus {
      JournalFocus::Date => &mut self.form.date,
      JournalFocus::Content => &mut self.form.content,
    }
  }
}

fn cycle(pos: usize, len: usize, forward: bool) -> usize {
  if forward { (pos + 1) % len } else { (pos + len - 1) % len }
}

fn shift_date(raw: &str, forward: bool) -> Option<String> {
  let date = parse_date(raw).ok()?;
  let shifted = if forward {
    date.checked_add_days(Days::new(1))
  } else {
    date.checked_sub_days(Days::new(1))
  }?;
  Some(shifted.format(DATE_FORMAT).to_string())
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub tab:     Tab,
  pub locale:  Locale,
  pub expense: ExpenseEditor,
  pub meal:    MealEditor,
  pub journal: JournalEditor,

  /// Outcome of the last save, shown until the next edit.
  pub status: Option<Status>,

  /// One-line message for non-save events (load failures).
  pub status_msg: String,

  /// Shared HTTP client.
  pub client: Arc<ApiClient>,

  prefill: Prefill<Journal>,
}

impl App {
  /// Create an [`App`] with blank forms dated `today`.
  pub fn new(client: ApiClient, locale: Locale, today: NaiveDate) -> Self {
    Self {
      tab: Tab::Expenses,
      locale,
      expense: ExpenseEditor {
        form:   ExpenseForm::new(today),
        focus:  ExpenseFocus::Date,
        errors: None,
      },
      meal: MealEditor {
        form:   MealForm::new(today),
        focus:  MealFocus::Date,
        errors: None,
      },
      journal: JournalEditor {
        form:   JournalForm::for_date(today, None),
        focus:  JournalFocus::Content,
        errors: None,
      },
      status: None,
      status_msg: String::new(),
      client: Arc::new(client),
      prefill: Prefill::new(),
    }
  }

  // ── Journal pre-fill ──────────────────────────────────────────────────────

  /// React to an edit of the journal date. A parseable date starts a fetch
  /// for that day; anything else cancels the fetch in flight.
  pub fn journal_date_changed(&mut self) {
    match parse_date(&self.journal.form.date) {
      Ok(date) => {
        let client = Arc::clone(&self.client);
        self
          .prefill
          .request(date, async move { client.get_journal(date).await });
      }
      Err(_) => self.prefill.cancel(),
    }
  }

  /// A pre-fill fetch for the current journal date is in flight.
  pub fn journal_loading(&self) -> bool { self.prefill.is_pending() }

  /// Apply any pre-fill result that has arrived. Called once per frame.
  pub fn tick(&mut self) {
    if let Some(fetched) = self.prefill.poll() {
      self.apply_prefill(fetched);
    }
  }

  /// Replace the journal content with the fetched entry, or clear it when
  /// the day has none. A failed fetch leaves the content alone.
  pub fn apply_prefill(&mut self, fetched: Fetched<Journal>) {
    match fetched.result {
      Ok(existing) => {
        self.journal.form.prefill(existing.as_ref());
        self.journal.errors = None;
      }
      Err(e) => {
        tracing::error!(date = %fetched.date, error = %e, "journal pre-fill failed");
        self.status_msg = match self.locale {
          Locale::En => "Could not load the journal entry.".into(),
          Locale::Ja => "日記を読み込めませんでした".into(),
        };
      }
    }
  }

  // ── Saving ────────────────────────────────────────────────────────────────

  /// Validate the active form and, if it passes, upsert it through the API.
  pub async fn save(&mut self) {
    self.status_msg.clear();
    match self.tab {
      Tab::Expenses => self.save_expense().await,
      Tab::Meals => self.save_meal().await,
      Tab::Journal => self.save_journal().await,
    }
  }

  async fn save_expense(&mut self) {
    let expense = match self.expense.form.validate() {
      Ok(expense) => expense,
      Err(errors) => {
        self.expense.errors = Some(errors);
        self.status = None;
        return;
      }
    };
    self.expense.errors = None;
    match self.client.save_expense(&expense).await {
      Ok(saved) => {
        tracing::info!(kind = "expense", date = %expense.date, outcome = ?saved.outcome, "saved");
        self.expense.form = ExpenseForm::from_expense(&saved.record.record);
        self.expense.focus = ExpenseFocus::Date;
        self.status = Some(Status::from(saved.outcome));
      }
      Err(e) => {
        tracing::error!(kind = "expense", date = %expense.date, error = %e, "save failed");
        self.status = Some(Status::Failed);
      }
    }
  }

  async fn save_meal(&mut self) {
    let meal = match self.meal.form.validate() {
      Ok(meal) => meal,
      Err(errors) => {
        self.meal.errors = Some(errors);
        self.status = None;
        return;
      }
    };
    self.meal.errors = None;
    match self.client.save_meal(&meal).await {
      Ok(saved) => {
        tracing::info!(kind = "meal", date = %meal.date, meal_type = %meal.meal_type, outcome = ?saved.outcome, "saved");
        self.meal.form = MealForm::from_meal(&saved.record.record);
        self.status = Some(Status::from(saved.outcome));
      }
      Err(e) => {
        tracing::error!(kind = "meal", date = %meal.date, error = %e, "save failed");
        self.status = Some(Status::Failed);
      }
    }
  }

  async fn save_journal(&mut self) {
    let journal = match self.journal.form.validate() {
      Ok(journal) => journal,
      Err(errors) => {
        self.journal.errors = Some(errors);
        self.status = None;
        return;
      }
    };
    self.journal.errors = None;
    match self.client.save_journal(&journal).await {
      Ok(saved) => {
        tracing::info!(kind = "journal", date = %journal.date, outcome = ?saved.outcome, "saved");
        self.journal.form.exists = true;
        self.status = Some(Status::from(saved.outcome));
      }
      Err(e) => {
        tracing::error!(kind = "journal", date = %journal.date, error = %e, "save failed");
        self.status = Some(Status::Failed);
      }
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global: Ctrl-C and Esc quit from anywhere.
    if (ctrl && key.code == KeyCode::Char('c')) || key.code == KeyCode::Esc {
      return Ok(false);
    }

    match key.code {
      KeyCode::F(1) => self.tab = Tab::Expenses,
      KeyCode::F(2) => self.tab = Tab::Meals,
      KeyCode::F(3) => self.tab = Tab::Journal,
      KeyCode::Char('s') if ctrl => self.save().await,
      _ => {
        self.edit(key);
        return Ok(true);
      }
    }
    Ok(true)
  }

  /// Keys that change the active form. Any edit clears the last status.
  fn edit(&mut self, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let before = self.status;
    self.status = None;

    match self.tab {
      Tab::Expenses => match key.code {
        KeyCode::Tab | KeyCode::Down => self.expense.step(true),
        KeyCode::BackTab | KeyCode::Up => self.expense.step(false),
        KeyCode::Char('a') if ctrl => self.expense.add_item(),
        KeyCode::Char('d') if ctrl => self.expense.remove_focused(),
        KeyCode::PageUp | KeyCode::PageDown
          if self.expense.focus == ExpenseFocus::Date =>
        {
          if let Some(d) = shift_date(&self.expense.form.date, key.code == KeyCode::PageDown) {
            self.expense.form.date = d;
          }
        }
        _ => type_into(self.expense.text(), key),
      },

      Tab::Meals => match key.code {
        KeyCode::Tab | KeyCode::Down => self.meal.step(true),
        KeyCode::BackTab | KeyCode::Up => self.meal.step(false),
        KeyCode::Left | KeyCode::Right if self.meal.focus == MealFocus::MealType => {
          self.meal.cycle_meal_type(key.code == KeyCode::Right)
        }
        KeyCode::PageUp | KeyCode::PageDown if self.meal.focus == MealFocus::Date => {
          if let Some(d) = shift_date(&self.meal.form.date, key.code == KeyCode::PageDown) {
            self.meal.form.date = d;
          }
        }
        _ => type_into(self.meal.text(), key),
      },

      Tab::Journal => {
        let on_date = self.journal.focus == JournalFocus::Date;
        match key.code {
          KeyCode::Tab | KeyCode::BackTab => {
            self.journal.focus = if on_date { JournalFocus::Content } else { JournalFocus::Date };
          }
          KeyCode::Enter if !on_date => self.journal.form.content.push('\n'),
          KeyCode::PageUp | KeyCode::PageDown if on_date => {
            if let Some(d) = shift_date(&self.journal.form.date, key.code == KeyCode::PageDown) {
              self.journal.form.date = d;
              self.journal_date_changed();
            }
          }
          _ => {
            let old = self.journal.form.date.clone();
            type_into(Some(self.journal.text()), key);
            if on_date && self.journal.form.date != old {
              self.journal_date_changed();
            }
          }
        }
      }
    }

    // Pure navigation keeps the status visible.
    if matches!(key.code, KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down) {
      self.status = before;
    }
  }

  // ── Rendering helpers ─────────────────────────────────────────────────────

  /// Errors for the active tab's form, if the last save failed validation.
  pub fn active_errors(&self) -> Option<&ValidationErrors> {
    match self.tab {
      Tab::Expenses => self.expense.errors.as_ref(),
      Tab::Meals => self.meal.errors.as_ref(),
      Tab::Journal => self.journal.errors.as_ref(),
    }
  }

  /// The localised inline message for `field` on the active tab.
  pub fn error_for(&self, field: Field) -> Option<String> {
    self
      .active_errors()
      .and_then(|e| e.for_field(field))
      .map(|e| e.message(self.locale))
  }
}

fn type_into(target: Option<&mut String>, key: KeyEvent) {
  let Some(text) = target else { return };
  if key.modifiers.contains(KeyModifiers::CONTROL) {
    return;
  }
  match key.code {
    KeyCode::Char(c) => text.push(c),
    KeyCode::Backspace => {
      text.pop();
    }
    _ => {}
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::client::ApiConfig;

  fn app() -> App {
    // Nothing listens here; tests never reach the network.
    let client = ApiClient::new(ApiConfig {
      base_url: "http://127.0.0.1:9".into(),
      username: String::new(),
      password: String::new(),
    })
    .unwrap();
    App::new(client, Locale::En, "2024-01-01".parse().unwrap())
  }

  fn key(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

  fn ctrl(c: char) -> KeyEvent { KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL) }

  async fn type_str(app: &mut App, s: &str) {
    for c in s.chars() {
      app.handle_key(key(KeyCode::Char(c))).await.unwrap();
    }
  }

  #[tokio::test]
  async fn quit_keys() {
    let mut app = app();
    assert!(!app.handle_key(key(KeyCode::Esc)).await.unwrap());
    assert!(!app.handle_key(ctrl('c')).await.unwrap());
    assert!(app.handle_key(key(KeyCode::F(2))).await.unwrap());
    assert_eq!(app.tab, Tab::Meals);
  }

  #[tokio::test]
  async fn expense_items_are_edited_in_place() {
    let mut app = app();
    app.handle_key(key(KeyCode::Tab)).await.unwrap();
    assert_eq!(app.expense.focus, ExpenseFocus::Name(0));
    type_str(&mut app, "lunch").await;
    app.handle_key(key(KeyCode::Tab)).await.unwrap();
    app.handle_key(key(KeyCode::Backspace)).await.unwrap();
    type_str(&mut app, "1200").await;

    app.handle_key(ctrl('a')).await.unwrap();
    assert_eq!(app.expense.form.items.len(), 2);
    assert_eq!(app.expense.focus, ExpenseFocus::Name(1));

    app.handle_key(ctrl('d')).await.unwrap();
    assert_eq!(app.expense.form.items.len(), 1);
    assert_eq!(app.expense.focus, ExpenseFocus::Name(0));
    assert_eq!(app.expense.form.items[0].name, "lunch");
    assert_eq!(app.expense.form.items[0].amount, "1200");
    assert_eq!(app.expense.form.total_preview(), 1200.0);
  }

  #[tokio::test]
  async fn invalid_expense_shows_inline_errors_without_saving() {
    let mut app = app();
    app.handle_key(key(KeyCode::Tab)).await.unwrap();
    app.handle_key(key(KeyCode::Tab)).await.unwrap();
    app.handle_key(key(KeyCode::Backspace)).await.unwrap();
    type_str(&mut app, "abc").await;
    app.handle_key(ctrl('s')).await.unwrap();

    assert!(app.status.is_none());
    assert_eq!(
      app.error_for(Field::ItemAmount(0)).as_deref(),
      Some("Amount must be a number")
    );
  }

  #[tokio::test]
  async fn meal_type_cycles_through_all() {
    let mut app = app();
    app.handle_key(key(KeyCode::F(2))).await.unwrap();
    app.handle_key(key(KeyCode::Tab)).await.unwrap();
    assert_eq!(app.meal.focus, MealFocus::MealType);

    app.handle_key(key(KeyCode::Right)).await.unwrap();
    assert_eq!(app.meal.form.meal_type, "breakfast");
    app.handle_key(key(KeyCode::Right)).await.unwrap();
    assert_eq!(app.meal.form.meal_type, "lunch");
    app.handle_key(key(KeyCode::Left)).await.unwrap();
    app.handle_key(key(KeyCode::Left)).await.unwrap();
    assert_eq!(app.meal.form.meal_type, "snack");
  }

  #[tokio::test]
  async fn date_field_steps_by_day() {
    let mut app = app();
    app.handle_key(key(KeyCode::PageDown)).await.unwrap();
    assert_eq!(app.expense.form.date, "2024-01-02");
    app.handle_key(key(KeyCode::PageUp)).await.unwrap();
    app.handle_key(key(KeyCode::PageUp)).await.unwrap();
    assert_eq!(app.expense.form.date, "2023-12-31");
  }

  #[tokio::test]
  async fn journal_date_edit_starts_and_cancels_prefill() {
    let mut app = app();
    app.handle_key(key(KeyCode::F(3))).await.unwrap();
    app.handle_key(key(KeyCode::Tab)).await.unwrap();
    assert_eq!(app.journal.focus, JournalFocus::Date);

    // "2024-01-0" no longer parses.
    app.handle_key(key(KeyCode::Backspace)).await.unwrap();
    assert!(!app.journal_loading());

    type_str(&mut app, "2").await;
    assert_eq!(app.journal.form.date, "2024-01-02");
    assert!(app.journal_loading());
  }

  #[tokio::test]
  async fn prefill_replaces_or_clears_content() {
    let mut app = app();
    app.journal.form.content = "draft".into();

    app.apply_prefill(Fetched {
      date:   "2024-01-01".parse().unwrap(),
      result: Ok(Some(Journal::new("2024-01-01".parse().unwrap(), "stored").unwrap())),
    });
    assert_eq!(app.journal.form.content, "stored");
    assert!(app.journal.form.exists);

    app.apply_prefill(Fetched { date: "2024-01-02".parse().unwrap(), result: Ok(None) });
    assert_eq!(app.journal.form.content, "");
    assert!(!app.journal.form.exists);

    app.journal.form.content = "keep".into();
    app.apply_prefill(Fetched {
      date:   "2024-01-03".parse().unwrap(),
      result: Err(anyhow::anyhow!("offline")),
    });
    assert_eq!(app.journal.form.content, "keep");
    assert!(!app.journal.form.exists);
    assert!(!app.status_msg.is_empty());
  }

  #[tokio::test]
  async fn journal_enter_inserts_newline() {
    let mut app = app();
    app.handle_key(key(KeyCode::F(3))).await.unwrap();
    type_str(&mut app, "a").await;
    app.handle_key(key(KeyCode::Enter)).await.unwrap();
    type_str(&mut app, "b").await;
    assert_eq!(app.journal.form.content, "a\nb");
  }
}
