//! Prediction reconciliation. Compares a logged cost prediction against
//! the adjudicated claim for the same visit and records the error.
//!
//! Design:
//!   - predicted = single-point estimate if one was logged, else range midpoint
//!   - error     = |actual - predicted|
//!   - error_pct = error / predicted * 100, two decimals; 0.0 when predicted is 0
//!   - one result per prediction: the check and the insert share one
//!     immediate transaction, and prediction_results.prediction_id is UNIQUE
//!   - reconciliation is lazy; nothing runs when a claim arrives

use crate::{
    error::{ShipError, ShipResult},
    store::{is_constraint_violation, PredictionResultRow, PredictionRow, ShipStore},
    types::PredictionId,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationSummary {
    pub status: String,
    pub prediction_id: PredictionId,
    pub actual: f64,
    pub predicted: f64,
    pub error: f64,
    pub error_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracySummary {
    pub uid: String,
    pub reconciled: i64,
    pub mean_absolute_error: Option<f64>,
    pub mean_error_pct: Option<f64>,
    pub max_error: Option<f64>,
}

/// The point estimate a prediction is judged against.
pub fn resolve_predicted(prediction: &PredictionRow) -> f64 {
    match prediction.predicted_total {
        Some(total) if total != 0.0 => total,
        _ => (prediction.predicted_range_min + prediction.predicted_range_max) / 2.0,
    }
}

/// Absolute error and error percentage (two decimals) of `predicted` vs `actual`.
pub fn error_metrics(actual: f64, predicted: f64) -> (f64, f64) {
    let error = (actual - predicted).abs();
    let error_pct = if predicted != 0.0 {
        round2(error / predicted * 100.0)
    } else {
        0.0
    };
    (error, error_pct)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Reconcile one prediction against its visit's claim and persist the result.
///
/// Fails with `NotFound` when the prediction is missing or has no visit,
/// `ClaimPending` when the visit has no claim yet (retry later), and
/// `AlreadyReconciled` when a result was stored before.
pub fn reconcile_prediction(
    store: &ShipStore,
    prediction_id: PredictionId,
) -> ShipResult<ReconciliationSummary> {
    let outcome = store.in_immediate_transaction(|store| {
        let prediction = store
            .get_prediction(prediction_id)?
            .ok_or_else(|| ShipError::not_found("Prediction", prediction_id))?;

        // A procedure-code-only estimate has nothing to reconcile against.
        let visit_id = prediction
            .visit_id
            .ok_or_else(|| ShipError::not_found("Visit for prediction", prediction_id))?;

        let claim = store
            .latest_claim_for_visit(visit_id)?
            .ok_or(ShipError::ClaimPending { visit_id })?;

        if store.get_prediction_result(prediction_id)?.is_some() {
            return Err(ShipError::AlreadyReconciled { prediction_id });
        }

        let actual = claim.student_paid;
        let predicted = resolve_predicted(&prediction);
        let (error, error_pct) = error_metrics(actual, predicted);

        store.insert_prediction_result(&PredictionResultRow {
            prediction_id,
            actual_student_paid: actual,
            error_amount: error,
            error_pct,
        })?;

        Ok(ReconciliationSummary {
            status: "logged".into(),
            prediction_id,
            actual,
            predicted,
            error,
            error_pct,
        })
    });

    match outcome {
        Ok(summary) => {
            log::info!(
                "prediction {prediction_id} reconciled: actual {:.2}, predicted {:.2}, error {:.2} ({}%)",
                summary.actual,
                summary.predicted,
                summary.error,
                summary.error_pct
            );
            Ok(summary)
        }
        Err(ShipError::ClaimPending { visit_id }) => {
            log::warn!("prediction {prediction_id}: no claim yet for visit {visit_id}");
            Err(ShipError::ClaimPending { visit_id })
        }
        // UNIQUE(prediction_id) rejected a duplicate from a concurrent writer.
        Err(e) if is_constraint_violation(&e) => {
            Err(ShipError::AlreadyReconciled { prediction_id })
        }
        Err(e) => Err(e),
    }
}

/// Aggregate error statistics over everything reconciled for `uid`.
pub fn prediction_accuracy(store: &ShipStore, uid: &str) -> ShipResult<AccuracySummary> {
    let row = store.prediction_accuracy(uid)?;
    Ok(AccuracySummary {
        uid: uid.to_string(),
        reconciled: row.reconciled,
        mean_absolute_error: row.mean_absolute_error.map(round2),
        mean_error_pct: row.mean_error_pct.map(round2),
        max_error: row.max_error,
    })
}
