//! Request router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//!
//! NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).

use axum::routing::{get, post};
use axum::Router;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::service::CoverageService;

/// Build the service router with its handler state attached.
pub fn api_router(service: CoverageService) -> Router {
    build_router(ApiContext::new(service))
}

fn build_router(ctx: ApiContext) -> Router {
    Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/students/:uid", get(endpoints::students::detail))
        .route(
            "/visits",
            get(endpoints::visits::list).post(endpoints::visits::create),
        )
        .route("/policy", get(endpoints::coverage::policy))
        .route("/oop_total", get(endpoints::coverage::oop_total))
        .route("/predictions", post(endpoints::predictions::create))
        .route(
            "/prediction_results",
            post(endpoints::predictions::reconcile),
        )
        .route(
            "/prediction_history",
            get(endpoints::predictions::history),
        )
        .route(
            "/prediction_accuracy",
            get(endpoints::predictions::accuracy),
        )
        .with_state(ctx)
}
