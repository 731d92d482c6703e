//! End-to-end requests through the axum router.

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use common::setup;
use serde_json::{json, Value};
use shipsmart_core::api::api_router;
use tower::ServiceExt;

fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_raw(uri: &str, content_type: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(ct) = content_type {
        builder = builder.header("content-type", ct);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::builder().method("POST").uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn health_is_ok() {
    let env = setup();
    let app = api_router(env.service.clone());
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn student_lookup_and_404() {
    let env = setup();
    env.enroll("918859330");
    let app = api_router(env.service.clone());

    let (status, body) = send(&app, get("/students/918859330")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["uc_student_uid"], "918859330");

    let (status, body) = send(&app, get("/students/000")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn visit_create_then_list() {
    let env = setup();
    env.enroll("s1");
    let app = api_router(env.service.clone());

    let (status, body) = send(
        &app,
        post_json(
            "/visits",
            json!({
                "uc_student_uid": "s1",
                "provider_id": 12,
                "cpt_code": "99213",
                "visit_date": "2025-10-03",
                "is_in_network": true
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let visit_id = body["visit_id"].as_i64().expect("visit id");

    let (status, body) = send(&app, get("/visits?uid=s1&start_date=2025-10-01&end_date=")).await;
    assert_eq!(status, StatusCode::OK);
    let visits = body.as_array().unwrap();
    assert_eq!(visits.len(), 1);
    assert_eq!(visits[0]["visit_id"], visit_id);
    assert_eq!(visits[0]["is_in_network"], true);
    assert_eq!(visits[0]["visit_type"], Value::Null);
}

#[tokio::test]
async fn visit_with_wrong_shape_is_422() {
    let env = setup();
    env.enroll("s1");
    let app = api_router(env.service.clone());

    // provider_id must be an integer
    let (status, body) = send(
        &app,
        post_json(
            "/visits",
            json!({
                "uc_student_uid": "s1",
                "provider_id": "twelve",
                "cpt_code": "99213",
                "visit_date": "2025-10-03"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "MALFORMED_BODY");

    // missing cpt_code
    let (status, _) = send(
        &app,
        post_json(
            "/visits",
            json!({ "uc_student_uid": "s1", "provider_id": 12, "visit_date": "2025-10-03" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    assert!(env.service.list_visits("s1", None, None).unwrap().is_empty());
}

#[tokio::test]
async fn policy_lookup_and_404() {
    let env = setup();
    env.policy("UCD", "2025-26", 400.0);
    let app = api_router(env.service.clone());

    let (status, body) = send(&app, get("/policy?campus=UCD&plan_year=2025-26")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deductible"], 400.0);
    assert_eq!(body["year_label"], "2025-26");

    let (status, _) = send(&app, get("/policy?campus=UCLA&plan_year=2025-26")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn oop_total_reports_status_only_when_empty() {
    let env = setup();
    env.enroll("s1");
    env.enroll("s2");
    let visit = env.visit("s1", "2025-10-01");
    env.claim("s1", visit, 42.5, "2025-10-15");
    let app = api_router(env.service.clone());

    let (status, body) = send(&app, get("/oop_total?uid=s1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["oop_total"], 42.5);
    assert!(body.get("status").is_none());

    let (_, body) = send(&app, get("/oop_total?uid=s2")).await;
    assert_eq!(body["oop_total"], 0.0);
    assert_eq!(body["status"], "no claims found");

    let (status, _) = send(&app, get("/oop_total?uid=s1&plan_year=1990-91")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn prediction_lifecycle() {
    let env = setup();
    env.enroll("s1");
    let visit = env.visit("s1", "2025-10-01");
    let app = api_router(env.service.clone());

    let (status, body) = send(
        &app,
        post_json(
            "/predictions",
            json!({
                "uc_student_uid": "s1",
                "visit_id": visit,
                "youpay_low": 50.0,
                "youpay_high": 150.0
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "logged");
    let prediction_id = body["prediction_id"].as_i64().unwrap();

    let uri = format!("/prediction_results?prediction_id={prediction_id}");
    let (status, body) = send(&app, post_empty(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "CLAIM_PENDING");

    env.claim("s1", visit, 120.0, "2025-10-20");
    let (status, body) = send(&app, post_empty(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["predicted"], 100.0);
    assert_eq!(body["actual"], 120.0);
    assert_eq!(body["error"], 20.0);
    assert_eq!(body["error_pct"], 20.0);

    let (status, body) = send(&app, post_empty(&uri)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "ALREADY_RECONCILED");

    let (_, body) = send(&app, get("/prediction_history?uid=s1")).await;
    assert_eq!(body[0]["prediction_id"], prediction_id);
    assert_eq!(body[0]["actual_student_paid"], 120.0);

    let (_, body) = send(&app, get("/prediction_accuracy?uid=s1")).await;
    assert_eq!(body["reconciled"], 1);
    assert_eq!(body["mean_absolute_error"], 20.0);
}

#[tokio::test]
async fn inverted_prediction_range_is_422() {
    let env = setup();
    env.enroll("s1");
    let app = api_router(env.service.clone());

    let (status, body) = send(
        &app,
        post_json(
            "/predictions",
            json!({
                "uc_student_uid": "s1",
                "cpt_code": "70450",
                "predicted_low": 300.0,
                "predicted_high": 100.0
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn standalone_prediction_cannot_be_reconciled() {
    let env = setup();
    env.enroll("s1");
    let prediction = env.predict("s1", None, 10.0, 30.0);
    let app = api_router(env.service.clone());

    let uri = format!("/prediction_results?prediction_id={prediction}");
    let (status, body) = send(&app, post_empty(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn missing_query_parameter_is_400() {
    let env = setup();
    let app = api_router(env.service.clone());

    let (status, body) = send(&app, get("/visits")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn undecodable_bodies_are_422() {
    let env = setup();
    env.enroll("s1");
    let app = api_router(env.service.clone());
    let visit = r#"{"uc_student_uid":"s1","provider_id":12,"cpt_code":"99213","visit_date":"2025-10-03"}"#;

    for uri in ["/visits", "/predictions"] {
        // truncated JSON
        let (status, body) = send(&app, post_raw(uri, Some("application/json"), r#"{"uc_student_uid": "#)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
        assert_eq!(body["error"]["code"], "MALFORMED_BODY");

        // well-formed JSON without a content type
        let (status, body) = send(&app, post_raw(uri, None, visit)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
        assert_eq!(body["error"]["code"], "MALFORMED_BODY");
    }

    assert!(env.service.list_visits("s1", None, None).unwrap().is_empty());
}

#[tokio::test]
async fn non_integer_prediction_id_is_400() {
    let env = setup();
    let app = api_router(env.service.clone());

    let (status, body) = send(&app, post_empty("/prediction_results?prediction_id=abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    let (status, _) = send(&app, post_empty("/prediction_results")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unpadded_visit_bound_is_422() {
    let env = setup();
    env.enroll("s1");
    let app = api_router(env.service.clone());

    let (status, body) = send(&app, get("/visits?uid=s1&start_date=2025-9-5")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_FAILED");
}
