//! [`SqliteStore`]: the SQLite implementation of [`RecordStore`].

use std::path::Path;

use chrono::Utc;
use daybook_core::{
  DateRange, Record, Saved, Stored, UpsertOutcome,
  store::{RecordStore, Store},
};
use rusqlite::{OptionalExtension as _, params_from_iter, types::Value};
use uuid::Uuid;

use crate::{
  Result,
  encode::{RawRow, decode_dt, decode_uuid, encode_date, encode_dt, encode_uuid},
  schema::SCHEMA,
  table::Table,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Daybook store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store: useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── SQL builders ────────────────────────────────────────────────────────────

/// `SELECT … WHERE k1 = ?1 AND k2 = ?2 LIMIT 1`
fn find_sql<T: Table>() -> String {
  let conds = T::KEY_COLUMNS
    .iter()
    .enumerate()
    .map(|(i, col)| format!("{col} = ?{}", i + 1))
    .collect::<Vec<_>>()
    .join(" AND ");
  format!(
    "SELECT {} FROM {} WHERE {conds} LIMIT 1",
    T::select_columns(),
    T::NAME
  )
}

/// A single-statement upsert keyed on the table's UNIQUE natural key.
///
/// Parameters: `?1` id, then key columns, then value columns, then the
/// timestamp used for both `created_at` and `updated_at`. On conflict only the
/// value columns and `updated_at` change, so the surviving row keeps its id.
fn upsert_sql<T: Table>() -> String {
  let key_cols = T::KEY_COLUMNS.join(", ");
  let value_cols = T::VALUE_COLUMNS.join(", ");
  let n = 1 + T::KEY_COLUMNS.len() + T::VALUE_COLUMNS.len();
  let placeholders = (1..=n)
    .map(|i| format!("?{i}"))
    .collect::<Vec<_>>()
    .join(", ");
  let now = n + 1;
  let updates = T::VALUE_COLUMNS
    .iter()
    .map(|col| format!("{col} = excluded.{col}"))
    .collect::<Vec<_>>()
    .join(", ");
  format!(
    "INSERT INTO {table} (id, {key_cols}, {value_cols}, created_at, updated_at)
     VALUES ({placeholders}, ?{now}, ?{now})
     ON CONFLICT ({key_cols}) DO UPDATE SET {updates}, updated_at = excluded.updated_at
     RETURNING id, created_at, updated_at",
    table = T::NAME,
  )
}

/// Open bounds are passed as NULL.
fn list_sql<T: Table>() -> String {
  format!(
    "SELECT {} FROM {}
     WHERE (?1 IS NULL OR date >= ?1) AND (?2 IS NULL OR date <= ?2)
     ORDER BY date",
    T::select_columns(),
    T::NAME
  )
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl Store for SqliteStore {
  type Error = crate::Error;
}

impl<T: Table> RecordStore<T> for SqliteStore {
  async fn find(&self, key: T::Key) -> Result<Option<Stored<T>>> {
    let sql = find_sql::<T>();
    let params = T::encode_key(&key);

    let raw: Option<RawRow> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, params_from_iter(params), RawRow::from_row::<T>)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRow::into_stored::<T>).transpose()
  }

  async fn upsert(&self, record: T) -> Result<Saved<T>> {
    let id = Uuid::new_v4();
    let now = encode_dt(Utc::now());

    let mut params = vec![Value::Text(encode_uuid(id))];
    params.extend(T::encode_key(&record.key()));
    params.extend(record.encode_values()?);
    params.push(Value::Text(now));

    let sql = upsert_sql::<T>();
    let (id_str, created_at, updated_at): (String, String, String) = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(&sql, params_from_iter(params), |row| {
          Ok((row.get(0)?, row.get(1)?, row.get(2)?))
        })?)
      })
      .await?;

    let stored_id = decode_uuid(&id_str)?;
    let outcome = if stored_id == id {
      UpsertOutcome::Created
    } else {
      UpsertOutcome::Updated
    };
    tracing::debug!(kind = %T::KIND, key = ?record.key(), ?outcome, "upserted");

    Ok(Saved {
      outcome,
      stored: Stored {
        id: stored_id,
        created_at: decode_dt(&created_at)?,
        updated_at: decode_dt(&updated_at)?,
        record,
      },
    })
  }

  async fn list(&self, range: DateRange) -> Result<Vec<Stored<T>>> {
    let sql = list_sql::<T>();
    let from = range.from.map(encode_date).unwrap_or(Value::Null);
    let to = range.to.map(encode_date).unwrap_or(Value::Null);

    let raws: Vec<RawRow> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(params_from_iter([from, to]), RawRow::from_row::<T>)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let mut stored = raws
      .into_iter()
      .map(RawRow::into_stored::<T>)
      .collect::<Result<Vec<_>>>()?;
    stored.sort_by_key(|s| s.record.key());
    Ok(stored)
  }
}
