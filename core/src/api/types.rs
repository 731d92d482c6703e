use std::sync::Arc;

use crate::api::error::ApiError;
use crate::error::ShipResult;
use crate::service::CoverageService;

/// Shared handler state. Holds configuration only; no data is cached here.
#[derive(Clone)]
pub struct ApiContext {
    pub service: Arc<CoverageService>,
}

impl ApiContext {
    pub fn new(service: CoverageService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Run one unit of store work on the blocking pool.
    ///
    /// rusqlite calls block, so they must not run on the async workers.
    pub async fn run<T, F>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&CoverageService) -> ShipResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let service = Arc::clone(&self.service);
        tokio::task::spawn_blocking(move || f(&service))
            .await
            .map_err(|e| ApiError::Internal(format!("store task failed: {e}")))?
            .map_err(ApiError::from)
    }
}
