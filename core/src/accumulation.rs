//! Out-of-pocket accumulation over a plan term.
//!
//! The window is passed in, never read from a global: the caller resolves
//! the `PlanTerm` for the plan year it cares about.

use crate::{
    error::{ShipError, ShipResult},
    store::ShipStore,
    types::PlanTerm,
};
use serde::{Deserialize, Serialize};

pub const NO_CLAIMS_STATUS: &str = "no claims found";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OopTotal {
    pub uid: String,
    pub oop_total: f64,
    /// Present only when no claim fell inside the term.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub plan_year: String,
    pub term_start: String,
    pub term_end: String,
}

/// Resolve the accumulation window for `year_label` from the plan-year table.
pub fn plan_term(store: &ShipStore, year_label: &str) -> ShipResult<PlanTerm> {
    let row = store
        .get_plan_year(year_label)?
        .ok_or_else(|| ShipError::not_found("Plan year", year_label))?;
    Ok(PlanTerm {
        year_label: row.year_label,
        start: row.term_start,
        end: row.term_end,
    })
}

/// Sum what `uid` paid on claims processed inside `term` (bounds inclusive).
pub fn oop_total(store: &ShipStore, uid: &str, term: &PlanTerm) -> ShipResult<OopTotal> {
    let totals = store.student_paid_between(uid, term.start, term.end)?;
    let (oop_total, status) = match totals.total {
        Some(total) if totals.claim_count > 0 => (total, None),
        _ => (0.0, Some(NO_CLAIMS_STATUS.to_string())),
    };
    log::debug!(
        "oop total for {uid} in {}: {oop_total:.2} over {} claim(s)",
        term.year_label,
        totals.claim_count
    );
    Ok(OopTotal {
        uid: uid.to_string(),
        oop_total,
        status,
        plan_year: term.year_label.clone(),
        term_start: term.start.to_string(),
        term_end: term.end.to_string(),
    })
}
