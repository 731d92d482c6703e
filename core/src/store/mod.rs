//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! Components call store methods and never execute SQL directly.

use crate::error::{ShipError, ShipResult};
use chrono::NaiveDate;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::time::Duration;

mod claim;
mod policy;
mod prediction;
mod student;
mod visit;

pub struct ShipStore {
    conn: Connection,
}

impl ShipStore {
    /// Open the database file at `path`, creating it if missing.
    pub fn open(path: &str) -> ShipResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in unit tests).
    pub fn in_memory() -> ShipResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// How long a statement waits on a locked database before failing.
    pub fn set_busy_timeout(&self, timeout: Duration) -> ShipResult<()> {
        self.conn.busy_timeout(timeout)?;
        Ok(())
    }

    /// Apply all schema migrations in order. Safe to run on every start.
    pub fn migrate(&self) -> ShipResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_foundation.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/002_visits_claims.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/003_predictions.sql"))?;
        Ok(())
    }

    /// Run `f` inside `BEGIN IMMEDIATE … COMMIT`. The write lock is taken up
    /// front, so a concurrent writer blocks (up to the busy timeout) instead
    /// of interleaving its read-check-write with ours.
    pub fn in_immediate_transaction<T>(
        &self,
        f: impl FnOnce(&Self) -> ShipResult<T>,
    ) -> ShipResult<T> {
        self.conn.execute_batch("BEGIN IMMEDIATE;")?;
        match f(self) {
            Ok(value) => {
                self.conn.execute_batch("COMMIT;")?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback) = self.conn.execute_batch("ROLLBACK;") {
                    log::error!("rollback failed: {rollback}");
                }
                Err(e)
            }
        }
    }
}

/// True when `err` is SQLite rejecting a UNIQUE / FOREIGN KEY / CHECK constraint.
pub(crate) fn is_constraint_violation(err: &ShipError) -> bool {
    matches!(
        err,
        ShipError::Database(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

// ── Row types ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub uc_student_uid: String,
    pub full_name: String,
    pub campus_flag: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    pub visit_id: i64,
    pub uc_student_uid: String,
    pub provider_id: i64,
    pub cpt_code: String,
    pub visit_date: String,
    pub visit_type: Option<String>,
    pub is_in_network: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanYearRow {
    pub year_label: String,
    pub term_start: NaiveDate,
    pub term_end: NaiveDate,
}

/// Numeric plan parameters for one (plan year, campus). Every amount is
/// optional: the extractor leaves a field empty when the plan document
/// does not state it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyParameters {
    #[serde(default)]
    pub policy_id: i64,
    pub year_label: String,
    pub campus_flag: String,
    #[serde(default)]
    pub effective_date: Option<String>,
    #[serde(default)]
    pub deductible: Option<f64>,
    #[serde(default)]
    pub family_deductible: Option<f64>,
    #[serde(default)]
    pub er_copay: Option<f64>,
    #[serde(default)]
    pub imaging_copay: Option<f64>,
    #[serde(default)]
    pub primary_care_copay: Option<f64>,
    #[serde(default)]
    pub coinsurance_pct: Option<f64>,
    #[serde(default)]
    pub oop_per_member: Option<f64>,
    #[serde(default)]
    pub oop_per_family: Option<f64>,
}

/// A claim as delivered by the adjudication feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewClaim {
    pub visit_id: i64,
    pub uc_student_uid: String,
    pub student_paid: f64,
    pub processed_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClaimRow {
    pub claim_id: i64,
    pub visit_id: i64,
    pub uc_student_uid: String,
    pub student_paid: f64,
    pub processed_date: NaiveDate,
}

/// `COUNT(*)` and `SUM(student_paid)` over a claim window. `total` is
/// `None` when no row matched (SQL `SUM` of nothing is NULL).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClaimTotals {
    pub claim_count: i64,
    pub total: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRow {
    pub prediction_id: i64,
    pub uc_student_uid: String,
    pub visit_id: Option<i64>,
    pub cpt_code: Option<String>,
    pub predicted_range_min: f64,
    pub predicted_range_max: f64,
    pub predicted_total: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResultRow {
    pub prediction_id: i64,
    pub actual_student_paid: f64,
    pub error_amount: f64,
    pub error_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionHistoryEntry {
    pub prediction_id: i64,
    pub visit_date: String,
    pub predicted_range_min: f64,
    pub predicted_range_max: f64,
    pub actual_student_paid: Option<f64>,
    pub error_amount: Option<f64>,
    pub error_pct: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccuracyRow {
    pub reconciled: i64,
    pub mean_absolute_error: Option<f64>,
    pub mean_error_pct: Option<f64>,
    pub max_error: Option<f64>,
}
