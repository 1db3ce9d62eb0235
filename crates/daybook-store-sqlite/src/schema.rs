//! SQL schema for the Daybook SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Each table's natural key carries a UNIQUE constraint; the upsert statement
/// targets it with `ON CONFLICT`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS expenses (
    id          TEXT PRIMARY KEY,
    date        TEXT NOT NULL UNIQUE,  -- YYYY-MM-DD
    items       TEXT NOT NULL,         -- JSON array of {name, amount}
    total       REAL NOT NULL,         -- sum of item amounts at write time
    created_at  TEXT NOT NULL,         -- RFC 3339 UTC
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS meals (
    id          TEXT PRIMARY KEY,
    date        TEXT NOT NULL,
    meal_type   TEXT NOT NULL,         -- 'breakfast' | 'lunch' | 'dinner' | 'snack'
    content     TEXT NOT NULL,
    calories    INTEGER NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL,
    UNIQUE (date, meal_type)
);

CREATE TABLE IF NOT EXISTS journals (
    id          TEXT PRIMARY KEY,
    date        TEXT NOT NULL UNIQUE,
    content     TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

PRAGMA user_version = 1;
";
