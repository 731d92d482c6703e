use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShipError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{entity} '{key}' not found")]
    NotFound { entity: &'static str, key: String },

    #[error("No claim has been processed yet for visit {visit_id}")]
    ClaimPending { visit_id: i64 },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Prediction {prediction_id} has already been reconciled")]
    AlreadyReconciled { prediction_id: i64 },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ShipError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        ShipError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ShipError::Validation(msg.into())
    }
}

pub type ShipResult<T> = Result<T, ShipError>;
