//! The request service: one entry point per network operation.
//!
//! RULES:
//!   - Stateless between calls. All state lives in the database.
//!   - Every call opens its own connection and drops it on return,
//!     including on error paths.
//!   - No retries. Store failures surface unchanged as `ShipError`.

use crate::{
    accumulation::{self, OopTotal},
    config::ServiceConfig,
    error::{ShipError, ShipResult},
    ingestion::{self, NewPrediction, NewVisit},
    policy_lookup,
    reconciliation::{self, AccuracySummary, ReconciliationSummary},
    store::{PolicyParameters, PredictionHistoryEntry, ShipStore, Student, Visit},
    types::{parse_iso_date, PredictionId, VisitId},
};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CoverageService {
    config: ServiceConfig,
}

impl CoverageService {
    pub fn new(config: ServiceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Open the database once and bring the schema up to date.
    pub fn migrate(&self) -> ShipResult<()> {
        self.open_store()?.migrate()?;
        log::info!("schema migrated at {}", self.config.db_path);
        Ok(())
    }

    /// A fresh connection for one unit of work.
    pub fn open_store(&self) -> ShipResult<ShipStore> {
        let store = ShipStore::open(&self.config.db_path)?;
        store.set_busy_timeout(Duration::from_millis(self.config.busy_timeout_ms))?;
        Ok(store)
    }

    // ── Reads ──────────────────────────────────────────────────────────

    pub fn get_student(&self, uid: &str) -> ShipResult<Student> {
        self.open_store()?
            .get_student(uid)?
            .ok_or_else(|| ShipError::not_found("Student", uid))
    }

    pub fn list_visits(
        &self,
        uid: &str,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> ShipResult<Vec<Visit>> {
        // Bounds compare as text against stored dates.
        if let Some(start) = start_date {
            parse_iso_date("start_date", start)?;
        }
        if let Some(end) = end_date {
            parse_iso_date("end_date", end)?;
        }
        self.open_store()?
            .visits_for_student(uid, start_date, end_date)
    }

    pub fn get_policy(&self, campus: &str, plan_year: &str) -> ShipResult<PolicyParameters> {
        policy_lookup::effective_policy(&self.open_store()?, campus, plan_year)
    }

    /// OOP total inside the term of `plan_year`, or of the configured
    /// active plan year when none is given.
    pub fn get_oop_total(&self, uid: &str, plan_year: Option<&str>) -> ShipResult<OopTotal> {
        let store = self.open_store()?;
        let label = plan_year.unwrap_or(&self.config.active_plan_year);
        let term = accumulation::plan_term(&store, label)?;
        accumulation::oop_total(&store, uid, &term)
    }

    pub fn prediction_history(&self, uid: &str) -> ShipResult<Vec<PredictionHistoryEntry>> {
        self.open_store()?.prediction_history(uid)
    }

    pub fn prediction_accuracy(&self, uid: &str) -> ShipResult<AccuracySummary> {
        reconciliation::prediction_accuracy(&self.open_store()?, uid)
    }

    // ── Writes ─────────────────────────────────────────────────────────

    pub fn add_visit(&self, visit: &NewVisit) -> ShipResult<VisitId> {
        ingestion::record_visit(&self.open_store()?, visit)
    }

    pub fn add_prediction(&self, prediction: &NewPrediction) -> ShipResult<PredictionId> {
        ingestion::record_prediction(&self.open_store()?, prediction)
    }

    pub fn log_prediction_result(
        &self,
        prediction_id: PredictionId,
    ) -> ShipResult<ReconciliationSummary> {
        reconciliation::reconcile_prediction(&self.open_store()?, prediction_id)
    }
}
