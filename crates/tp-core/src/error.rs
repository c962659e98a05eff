use thiserror::Error;
use tp_db::StoreError;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error(transparent)]
    Store(#[from] StoreError),
}
