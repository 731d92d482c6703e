use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::ingestion::NewVisit;
use crate::store::Visit;
use crate::types::VisitId;

#[derive(Debug, Deserialize)]
pub struct VisitQuery {
    pub uid: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VisitCreated {
    pub visit_id: VisitId,
}

/// `GET /visits?uid=&start_date=&end_date=`: bounds inclusive, either optional.
pub async fn list(
    State(ctx): State<ApiContext>,
    query: Result<Query<VisitQuery>, QueryRejection>,
) -> Result<Json<Vec<Visit>>, ApiError> {
    let Query(q) = query?;
    // An empty bound means "unbounded", same as leaving it out.
    let start = q.start_date.filter(|s| !s.is_empty());
    let end = q.end_date.filter(|s| !s.is_empty());
    let visits = ctx
        .run(move |svc| svc.list_visits(&q.uid, start.as_deref(), end.as_deref()))
        .await?;
    Ok(Json(visits))
}

/// `POST /visits`
pub async fn create(
    State(ctx): State<ApiContext>,
    payload: Result<Json<NewVisit>, JsonRejection>,
) -> Result<(StatusCode, Json<VisitCreated>), ApiError> {
    let Json(visit) = payload?;
    let visit_id = ctx.run(move |svc| svc.add_visit(&visit)).await?;
    Ok((StatusCode::CREATED, Json(VisitCreated { visit_id })))
}
