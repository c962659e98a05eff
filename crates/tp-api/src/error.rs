use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use thiserror::Error;
use tp_core::CoreError;
use tp_db::StoreError;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// A directly requested record does not exist
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    /// A record referenced from a request body does not exist
    #[error("referenced {entity} {id} not found")]
    InvalidReference { entity: &'static str, id: Uuid },

    /// Nothing matched a sampling or search request
    #[error("{0}")]
    NoMatch(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("store error: {0}")]
    Store(StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidReference { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } | Self::NoMatch(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> Value {
        match self {
            Self::Validation(details) => json!({
                "error": "Validation error",
                "details": details,
            }),
            Self::NotFound { entity, id } | Self::InvalidReference { entity, id } => {
                let mut body = json!({ "error": format!("{} not found", capitalize(entity)) });
                body[format!("{entity}Id")] = json!(id);
                body
            }
            Self::NoMatch(message) => json!({ "error": message }),
            Self::Conflict(message) => json!({ "error": message }),
            Self::Store(_) => json!({
                "error": "Internal server error",
                "timestamp": chrono::Utc::now().to_rfc3339(),
            }),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Store(err) = &self {
            tracing::error!(error = %err, "Store operation failed");
        }
        (self.status(), Json(self.body())).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(message) | StoreError::OutOfRange(message) => {
                Self::Conflict(message)
            }
            StoreError::InvalidReference(message) => Self::Validation(message),
            other => Self::Store(other),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(details) => Self::Validation(details),
            CoreError::NotFound { entity, id } => Self::NotFound { entity, id },
            CoreError::Store(err) => err.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}
