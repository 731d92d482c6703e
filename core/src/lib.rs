//! Student health-plan usage tracking: visits, cost predictions, claim
//! reconciliation and plan-term out-of-pocket accumulation.

pub mod accumulation;
pub mod api;
pub mod config;
pub mod error;
pub mod import;
pub mod ingestion;
pub mod policy_lookup;
pub mod reconciliation;
pub mod service;
pub mod store;
pub mod types;
