//! Shared fixtures: a migrated file-backed database in a temp dir, plus
//! helpers standing in for the external enrollment and claims feeds.

#![allow(dead_code)]

use chrono::NaiveDate;
use shipsmart_core::{
    config::ServiceConfig,
    ingestion::{NewPrediction, NewVisit},
    service::CoverageService,
    store::{NewClaim, PolicyParameters, Student},
};
use tempfile::TempDir;

pub struct TestEnv {
    pub service: CoverageService,
    // Dropping the dir deletes the database.
    _dir: TempDir,
}

pub fn setup() -> TestEnv {
    let _ = env_logger::builder().is_test(true).try_init();
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("ucship.db");
    let config = ServiceConfig::default_test(db_path.to_str().expect("utf-8 path"));
    let service = CoverageService::new(config);
    service.migrate().expect("migration");
    TestEnv { service, _dir: dir }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("test date")
}

impl TestEnv {
    pub fn enroll(&self, uid: &str) {
        let store = self.service.open_store().unwrap();
        store
            .insert_student(&Student {
                uc_student_uid: uid.into(),
                full_name: format!("Student {uid}"),
                campus_flag: "UCD".into(),
                email: None,
            })
            .expect("insert student");
    }

    pub fn visit(&self, uid: &str, visit_date: &str) -> i64 {
        self.service
            .add_visit(&NewVisit {
                uc_student_uid: uid.into(),
                provider_id: 101,
                cpt_code: "99213".into(),
                visit_date: visit_date.into(),
                visit_type: Some("primary_care".into()),
                is_in_network: Some(true),
            })
            .expect("add visit")
    }

    /// Claims-feed stand-in.
    pub fn claim(&self, uid: &str, visit_id: i64, paid: f64, processed: &str) {
        let store = self.service.open_store().unwrap();
        store
            .insert_claim(&NewClaim {
                visit_id,
                uc_student_uid: uid.into(),
                student_paid: paid,
                processed_date: date(processed),
            })
            .expect("insert claim");
    }

    pub fn predict(&self, uid: &str, visit_id: Option<i64>, low: f64, high: f64) -> i64 {
        self.service
            .add_prediction(&NewPrediction {
                uc_student_uid: uid.into(),
                visit_id,
                cpt_code: Some("99213".into()),
                predicted_low: low,
                predicted_high: high,
                predicted_total: None,
            })
            .expect("add prediction")
    }

    pub fn policy(&self, campus: &str, plan_year: &str, deductible: f64) {
        let store = self.service.open_store().unwrap();
        store
            .insert_policy_parameters(&PolicyParameters {
                policy_id: 0,
                year_label: plan_year.into(),
                campus_flag: campus.into(),
                effective_date: Some("2025-09-15".into()),
                deductible: Some(deductible),
                family_deductible: None,
                er_copay: Some(150.0),
                imaging_copay: Some(100.0),
                primary_care_copay: Some(20.0),
                coinsurance_pct: Some(80.0),
                oop_per_member: Some(3_000.0),
                oop_per_family: None,
            })
            .expect("insert policy");
    }
}
