//! Validated write paths for visits and predictions.
//!
//! Shape errors (missing field, wrong JSON type) are rejected by serde at the
//! HTTP boundary. Everything here runs before the write and rejects with
//! `ShipError::Validation`, so a rejected record never reaches the store.

use crate::{
    error::{ShipError, ShipResult},
    store::ShipStore,
    types::{parse_iso_date, PredictionId, VisitId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewVisit {
    pub uc_student_uid: String,
    pub provider_id: i64,
    pub cpt_code: String,
    pub visit_date: String,
    #[serde(default)]
    pub visit_type: Option<String>,
    #[serde(default)]
    pub is_in_network: Option<bool>,
}

impl NewVisit {
    pub fn validate(&self) -> ShipResult<()> {
        require_non_empty("uc_student_uid", &self.uc_student_uid)?;
        require_non_empty("cpt_code", &self.cpt_code)?;
        parse_iso_date("visit_date", &self.visit_date)?;
        Ok(())
    }
}

/// A cost estimate produced by the external predictor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPrediction {
    pub uc_student_uid: String,
    #[serde(default)]
    pub visit_id: Option<VisitId>,
    #[serde(default)]
    pub cpt_code: Option<String>,
    #[serde(alias = "youpay_low")]
    pub predicted_low: f64,
    #[serde(alias = "youpay_high")]
    pub predicted_high: f64,
    /// Single-point estimate. When absent the reconciler uses the range midpoint.
    #[serde(default)]
    pub predicted_total: Option<f64>,
}

impl NewPrediction {
    pub fn validate(&self) -> ShipResult<()> {
        require_non_empty("uc_student_uid", &self.uc_student_uid)?;
        require_amount("predicted_low", self.predicted_low)?;
        require_amount("predicted_high", self.predicted_high)?;
        if let Some(total) = self.predicted_total {
            require_amount("predicted_total", total)?;
        }
        if self.predicted_low > self.predicted_high {
            return Err(ShipError::validation(format!(
                "predicted_low ({}) must not exceed predicted_high ({})",
                self.predicted_low, self.predicted_high
            )));
        }
        if self.visit_id.is_none() && self.cpt_code.as_deref().map_or(true, str::is_empty) {
            return Err(ShipError::validation(
                "a prediction needs a visit_id or a cpt_code",
            ));
        }
        Ok(())
    }
}

/// Validate and append one visit. Returns the generated visit id.
pub fn record_visit(store: &ShipStore, visit: &NewVisit) -> ShipResult<VisitId> {
    visit.validate()?;
    if !store.student_exists(&visit.uc_student_uid)? {
        return Err(ShipError::not_found("Student", &visit.uc_student_uid));
    }
    let visit_id = store.insert_visit(visit)?;
    log::info!(
        "visit {visit_id} recorded for {} ({} on {})",
        visit.uc_student_uid,
        visit.cpt_code,
        visit.visit_date
    );
    Ok(visit_id)
}

/// Validate and append one prediction. Returns the generated prediction id.
pub fn record_prediction(store: &ShipStore, prediction: &NewPrediction) -> ShipResult<PredictionId> {
    prediction.validate()?;
    if !store.student_exists(&prediction.uc_student_uid)? {
        return Err(ShipError::not_found("Student", &prediction.uc_student_uid));
    }
    if let Some(visit_id) = prediction.visit_id {
        let visit = store
            .get_visit(visit_id)?
            .ok_or_else(|| ShipError::not_found("Visit", visit_id))?;
        if visit.uc_student_uid != prediction.uc_student_uid {
            return Err(ShipError::validation(format!(
                "visit {visit_id} belongs to a different student"
            )));
        }
    }
    let prediction_id = store.insert_prediction(prediction)?;
    log::info!(
        "prediction {prediction_id} logged for {} (range {:.2}..{:.2})",
        prediction.uc_student_uid,
        prediction.predicted_low,
        prediction.predicted_high
    );
    Ok(prediction_id)
}

fn require_non_empty(field: &str, value: &str) -> ShipResult<()> {
    if value.trim().is_empty() {
        return Err(ShipError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}

fn require_amount(field: &str, value: f64) -> ShipResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ShipError::validation(format!(
            "{field} must be a non-negative amount, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(low: f64, high: f64) -> NewPrediction {
        NewPrediction {
            uc_student_uid: "918859330".into(),
            visit_id: None,
            cpt_code: Some("99213".into()),
            predicted_low: low,
            predicted_high: high,
            predicted_total: None,
        }
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = prediction(150.0, 50.0).validate().unwrap_err();
        assert!(matches!(err, ShipError::Validation(_)));
    }

    #[test]
    fn degenerate_range_is_accepted() {
        prediction(75.0, 75.0).validate().unwrap();
    }

    #[test]
    fn negative_amounts_are_rejected() {
        assert!(prediction(-1.0, 10.0).validate().is_err());
        let mut p = prediction(0.0, 10.0);
        p.predicted_total = Some(-3.0);
        assert!(p.validate().is_err());
    }

    #[test]
    fn prediction_needs_visit_or_procedure() {
        let mut p = prediction(10.0, 20.0);
        p.cpt_code = None;
        assert!(p.validate().is_err());
        p.visit_id = Some(7);
        p.validate().unwrap();
    }

    #[test]
    fn youpay_aliases_deserialize() {
        let p: NewPrediction = serde_json::from_str(
            r#"{ "uc_student_uid": "s1", "cpt_code": "70450",
                 "youpay_low": 40.0, "youpay_high": 90.5 }"#,
        )
        .unwrap();
        assert_eq!(p.predicted_low, 40.0);
        assert_eq!(p.predicted_high, 90.5);
        assert_eq!(p.visit_id, None);
        assert_eq!(p.predicted_total, None);
    }

    #[test]
    fn visit_date_must_be_iso() {
        let v = NewVisit {
            uc_student_uid: "s1".into(),
            provider_id: 12,
            cpt_code: "99213".into(),
            visit_date: "10/03/2025".into(),
            visit_type: None,
            is_in_network: Some(true),
        };
        assert!(matches!(v.validate(), Err(ShipError::Validation(_))));
    }
}
