use serde::Deserialize;
use tp_core::{FactProgressInput, FlashcardProgressInput};
use tp_db::models::DateRange;
use uuid::Uuid;

use crate::{error::ApiError, validation};

const fn default_true() -> bool {
    true
}

const fn default_attempts() -> i32 {
    1
}

/// Request body for `POST /progress/facts`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackFactRequest {
    pub user_id: String,
    pub fact_id: Uuid,
    #[serde(default = "default_true")]
    pub is_completed: bool,
    #[serde(default)]
    pub time_spent: i64,
}

impl From<TrackFactRequest> for FactProgressInput {
    fn from(req: TrackFactRequest) -> Self {
        Self {
            user_id: req.user_id,
            fact_id: req.fact_id,
            is_completed: req.is_completed,
            time_spent: req.time_spent,
        }
    }
}

/// Request body for `POST /progress/flashcards`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackFlashcardRequest {
    pub user_id: String,
    pub flashcard_id: Uuid,
    #[serde(default = "default_true")]
    pub is_completed: bool,
    #[serde(default = "default_attempts")]
    pub attempts: i32,
    #[serde(default)]
    pub time_spent: i64,
}

impl From<TrackFlashcardRequest> for FlashcardProgressInput {
    fn from(req: TrackFlashcardRequest) -> Self {
        Self {
            user_id: req.user_id,
            flashcard_id: req.flashcard_id,
            is_completed: req.is_completed,
            attempts: req.attempts,
            time_spent: req.time_spent,
        }
    }
}

/// Optional date bounds for `GET /progress/{user_id}`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl SummaryQuery {
    pub fn date_range(&self) -> Result<DateRange, ApiError> {
        let start = self
            .start_date
            .as_deref()
            .map(|v| validation::parse_date_param("startDate", v))
            .transpose()?;
        let end = self
            .end_date
            .as_deref()
            .map(|v| validation::parse_date_param("endDate", v))
            .transpose()?;

        Ok(DateRange { start, end })
    }
}
