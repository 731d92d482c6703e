//! Plan-level reads: policy parameters and the out-of-pocket total.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::accumulation::OopTotal;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::store::PolicyParameters;

#[derive(Debug, Deserialize)]
pub struct PolicyQuery {
    pub campus: String,
    pub plan_year: String,
}

#[derive(Debug, Deserialize)]
pub struct OopQuery {
    pub uid: String,
    pub plan_year: Option<String>,
}

/// `GET /policy?campus=&plan_year=`
pub async fn policy(
    State(ctx): State<ApiContext>,
    query: Result<Query<PolicyQuery>, QueryRejection>,
) -> Result<Json<PolicyParameters>, ApiError> {
    let Query(q) = query?;
    let policy = ctx
        .run(move |svc| svc.get_policy(&q.campus, &q.plan_year))
        .await?;
    Ok(Json(policy))
}

/// `GET /oop_total?uid=&plan_year=`: plan year defaults to the active one.
pub async fn oop_total(
    State(ctx): State<ApiContext>,
    query: Result<Query<OopQuery>, QueryRejection>,
) -> Result<Json<OopTotal>, ApiError> {
    let Query(q) = query?;
    let total = ctx
        .run(move |svc| svc.get_oop_total(&q.uid, q.plan_year.as_deref()))
        .await?;
    Ok(Json(total))
}
