//! Expense persistence.
//!
//! The pipeline only ever declares what it needs (the prior record) and
//! what it produces (a new or merged record); this module is the
//! collaborator that owns the rows. `apply_merge` carries the optimistic
//! check: writes are rejected as stale when the record changed after it
//! was read.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::info;

use chitieu_common::model::{Category, ExpenseRecord, NewExpense};

/// Result of an optimistic merge write. Tagged variants, not errors.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeApply {
    Applied(ExpenseRecord),
    /// The record's `updated_at` no longer matches what was read.
    Stale,
    NotFound,
}

/// Storage interface consumed by the caller-side driver.
pub trait ExpenseStore {
    /// Latest expense for a user, the edit target.
    fn latest(&self, user_id: i64) -> Result<Option<ExpenseRecord>>;

    /// Persist a new expense; the store assigns identity and timestamps.
    fn append(&self, user_id: i64, new: &NewExpense) -> Result<ExpenseRecord>;

    /// Write a merged record if and only if the row still carries the
    /// `updated_at` observed at read time.
    fn apply_merge(
        &self,
        id: i64,
        read_at: DateTime<Utc>,
        merged: &ExpenseRecord,
    ) -> Result<MergeApply>;

    /// Expenses created since `since`, oldest first.
    fn recent(&self, user_id: i64, since: DateTime<Utc>) -> Result<Vec<ExpenseRecord>>;
}

/// SQLite-backed store, schema carried over from the original bot.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path).with_context(|| format!("open database {}", path))?;
        let store = Self { conn };
        store.init_schema()?;
        info!("expense store ready at {}", path);
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS expenses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                amount INTEGER NOT NULL,
                description TEXT NOT NULL,
                category TEXT NOT NULL,
                raw_text TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_expenses_user ON expenses(user_id, id);",
        )?;
        Ok(())
    }

    fn get(&self, id: i64) -> Result<Option<ExpenseRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT id, user_id, amount, description, category, raw_text, created_at, updated_at
                 FROM expenses WHERE id = ?1",
                params![id],
                row_to_record,
            )
            .optional()?;
        Ok(record)
    }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<ExpenseRecord> {
    let category: String = row.get(4)?;
    Ok(ExpenseRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        amount: row.get(2)?,
        description: row.get(3)?,
        category: Category::from_oracle(&category),
        raw_text: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

impl ExpenseStore for SqliteStore {
    fn latest(&self, user_id: i64) -> Result<Option<ExpenseRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT id, user_id, amount, description, category, raw_text, created_at, updated_at
                 FROM expenses WHERE user_id = ?1 ORDER BY id DESC LIMIT 1",
                params![user_id],
                row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    fn append(&self, user_id: i64, new: &NewExpense) -> Result<ExpenseRecord> {
        let now = Utc::now();
        self.conn.execute(
            "INSERT INTO expenses (user_id, amount, description, category, raw_text, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                user_id,
                new.amount,
                new.description,
                new.category.as_str(),
                new.raw_text,
                now,
                now
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.get(id)?
            .context("appended expense vanished before read-back")
    }

    fn apply_merge(
        &self,
        id: i64,
        read_at: DateTime<Utc>,
        merged: &ExpenseRecord,
    ) -> Result<MergeApply> {
        let now = Utc::now();
        let rows = self.conn.execute(
            "UPDATE expenses
             SET amount = ?1, description = ?2, category = ?3, raw_text = ?4, updated_at = ?5
             WHERE id = ?6 AND updated_at = ?7",
            params![
                merged.amount,
                merged.description,
                merged.category.as_str(),
                merged.raw_text,
                now,
                id,
                read_at
            ],
        )?;

        if rows == 1 {
            return match self.get(id)? {
                Some(record) => Ok(MergeApply::Applied(record)),
                None => Ok(MergeApply::NotFound),
            };
        }

        // Zero rows: either the record is gone or someone wrote in between.
        match self.get(id)? {
            Some(_) => Ok(MergeApply::Stale),
            None => Ok(MergeApply::NotFound),
        }
    }

    fn recent(&self, user_id: i64, since: DateTime<Utc>) -> Result<Vec<ExpenseRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, amount, description, category, raw_text, created_at, updated_at
             FROM expenses WHERE user_id = ?1 AND created_at >= ?2 ORDER BY id ASC",
        )?;
        let rows = stmt.query_map(params![user_id, since], row_to_record)?;
        let mut expenses = Vec::new();
        for row in rows {
            expenses.push(row?);
        }
        Ok(expenses)
    }
}
