use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::ingestion::NewPrediction;
use crate::reconciliation::{AccuracySummary, ReconciliationSummary};
use crate::store::PredictionHistoryEntry;
use crate::types::PredictionId;

#[derive(Debug, Deserialize)]
pub struct UidQuery {
    pub uid: String,
}

#[derive(Debug, Deserialize)]
pub struct ReconcileQuery {
    pub prediction_id: PredictionId,
}

#[derive(Debug, Serialize)]
pub struct PredictionLogged {
    pub status: &'static str,
    pub prediction_id: PredictionId,
}

/// `POST /predictions`
pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<NewPrediction>, JsonRejection>,
) -> Result<(StatusCode, Json<PredictionLogged>), ApiError> {
    let Json(prediction) = payload?;
    let prediction_id = ctx.run(move |svc| svc.add_prediction(&prediction)).await?;
    Ok((
        StatusCode::CREATED,
        Json(PredictionLogged {
            status: "logged",
            prediction_id,
        }),
    ))
}

/// `POST /prediction_results?prediction_id=`
pub async fn reconcile(
    State(ctx): State<ApiContext>,
    query: Result<Query<ReconcileQuery>, QueryRejection>,
) -> Result<Json<ReconciliationSummary>, ApiError> {
    let Query(q) = query?;
    let summary = ctx
        .run(move |svc| svc.log_prediction_result(q.prediction_id))
        .await?;
    Ok(Json(summary))
}

/// `GET /prediction_history?uid=`: newest visit first.
pub async fn history(
    State(ctx): State<ApiContext>,
    query: Result<Query<UidQuery>, QueryRejection>,
) -> Result<Json<Vec<PredictionHistoryEntry>>, ApiError> {
    let Query(q) = query?;
    let history = ctx.run(move |svc| svc.prediction_history(&q.uid)).await?;
    Ok(Json(history))
}

/// `GET /prediction_accuracy?uid=`
pub async fn accuracy(
    State(ctx): State<ApiContext>,
    query: Result<Query<UidQuery>, QueryRejection>,
) -> Result<Json<AccuracySummary>, ApiError> {
    let Query(q) = query?;
    let summary = ctx.run(move |svc| svc.prediction_accuracy(&q.uid)).await?;
    Ok(Json(summary))
}
