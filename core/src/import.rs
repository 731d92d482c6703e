//! Bulk load of externally produced reference data.
//!
//! The service never creates students, plan years, policy rows or claims.
//! Those come from the enrollment feed, the plan-document extractor and the
//! claims-adjudication feed. This module writes their JSON output into the
//! store in a single transaction: either the whole document lands or none of it.

use crate::{
    error::{ShipError, ShipResult},
    store::{NewClaim, PlanYearRow, PolicyParameters, ShipStore, Student},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedDocument {
    pub students: Vec<Student>,
    pub plan_years: Vec<PlanYearRow>,
    pub policy_parameters: Vec<PolicyParameters>,
    pub claims: Vec<NewClaim>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportCounts {
    pub students: usize,
    pub plan_years: usize,
    pub policy_parameters: usize,
    pub claims: usize,
}

impl SeedDocument {
    pub fn from_json(content: &str) -> ShipResult<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Write `doc` in dependency order: plan years and students, then policy
/// rows, then claims.
pub fn import_seed(store: &ShipStore, doc: &SeedDocument) -> ShipResult<ImportCounts> {
    for py in &doc.plan_years {
        if py.term_start > py.term_end {
            return Err(ShipError::validation(format!(
                "plan year {} ends before it starts",
                py.year_label
            )));
        }
    }
    for claim in &doc.claims {
        if !claim.student_paid.is_finite() || claim.student_paid < 0.0 {
            return Err(ShipError::validation(format!(
                "claim for visit {} has invalid student_paid {}",
                claim.visit_id, claim.student_paid
            )));
        }
    }

    let counts = store.in_immediate_transaction(|store| {
        for py in &doc.plan_years {
            store.upsert_plan_year(py)?;
        }
        for student in &doc.students {
            store.insert_student(student)?;
        }
        for policy in &doc.policy_parameters {
            store.insert_policy_parameters(policy)?;
        }
        for claim in &doc.claims {
            store.insert_claim(claim)?;
        }
        Ok(ImportCounts {
            students: doc.students.len(),
            plan_years: doc.plan_years.len(),
            policy_parameters: doc.policy_parameters.len(),
            claims: doc.claims.len(),
        })
    })?;

    log::info!(
        "imported {} student(s), {} plan year(s), {} policy row(s), {} claim(s)",
        counts.students,
        counts.plan_years,
        counts.policy_parameters,
        counts.claims
    );
    Ok(counts)
}
