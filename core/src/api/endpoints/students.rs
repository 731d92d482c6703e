use axum::extract::{Path, State};
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::store::Student;

/// `GET /students/:uid`
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(uid): Path<String>,
) -> Result<Json<Student>, ApiError> {
    let student = ctx.run(move |svc| svc.get_student(&uid)).await?;
    Ok(Json(student))
}
