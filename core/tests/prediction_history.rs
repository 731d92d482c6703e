mod common;

use common::setup;

#[test]
fn history_mixes_reconciled_and_pending_newest_first() {
    let env = setup();
    env.enroll("s1");
    let older = env.visit("s1", "2025-09-20");
    let newer = env.visit("s1", "2025-12-05");

    let reconciled = env.predict("s1", Some(older), 50.0, 150.0);
    let pending = env.predict("s1", Some(newer), 20.0, 40.0);
    env.claim("s1", older, 120.0, "2025-10-01");
    env.service.log_prediction_result(reconciled).unwrap();

    let history = env.service.prediction_history("s1").unwrap();
    assert_eq!(history.len(), 2);

    assert_eq!(history[0].prediction_id, pending);
    assert_eq!(history[0].visit_date, "2025-12-05");
    assert_eq!(history[0].predicted_range_min, 20.0);
    assert_eq!(history[0].predicted_range_max, 40.0);
    assert_eq!(history[0].actual_student_paid, None);
    assert_eq!(history[0].error_amount, None);
    assert_eq!(history[0].error_pct, None);

    assert_eq!(history[1].prediction_id, reconciled);
    assert_eq!(history[1].visit_date, "2025-09-20");
    assert_eq!(history[1].actual_student_paid, Some(120.0));
    assert_eq!(history[1].error_amount, Some(20.0));
    assert_eq!(history[1].error_pct, Some(20.0));
}

#[test]
fn standalone_predictions_are_not_in_history() {
    let env = setup();
    env.enroll("s1");
    env.predict("s1", None, 10.0, 20.0);
    assert!(env.service.prediction_history("s1").unwrap().is_empty());
}

#[test]
fn history_is_per_student() {
    let env = setup();
    env.enroll("s1");
    env.enroll("s2");
    let v = env.visit("s2", "2025-10-01");
    env.predict("s2", Some(v), 10.0, 20.0);

    assert!(env.service.prediction_history("s1").unwrap().is_empty());
    assert_eq!(env.service.prediction_history("s2").unwrap().len(), 1);
}
