//! Effective policy parameters for a (campus, plan year) pair.
//!
//! Read-through: every call hits the store. Policy rows are few and change
//! only when the extractor runs.

use crate::{
    error::{ShipError, ShipResult},
    store::{PolicyParameters, ShipStore},
};

pub fn effective_policy(
    store: &ShipStore,
    campus: &str,
    plan_year: &str,
) -> ShipResult<PolicyParameters> {
    store
        .policy_for(campus, plan_year)?
        .ok_or_else(|| ShipError::not_found("Policy", format!("{campus}/{plan_year}")))
}
