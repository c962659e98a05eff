//! Per-user progress tracking.
//!
//! One record exists per (user, item) pair. Repeated tracking calls are folded
//! into that record by the store's atomic upsert; the tracker itself only
//! validates input and checks that the referenced item exists.

use std::sync::Arc;

use serde::Serialize;
use tp_db::{
    ContentStore, StoreError,
    models::{
        DateRange, FactProgress, FactProgressUpdate, FlashcardProgress, FlashcardProgressUpdate,
    },
};
use uuid::Uuid;

use crate::{
    error::CoreError,
    stats::{ContentStats, Statistics},
};

/// Number of most recent records per content type considered by the summary.
///
/// Statistics cover this window only, not the full history.
pub const SUMMARY_WINDOW: i64 = 50;

pub const MAX_USER_ID_LEN: usize = 128;

/// Upper bound on `attempts` reported by a single tracking call.
pub const MAX_ATTEMPTS_PER_CALL: i32 = 1_000;

/// Upper bound on `timeSpent` (seconds) reported by a single tracking call.
pub const MAX_TIME_SPENT_PER_CALL: i64 = 86_400;

#[derive(Debug, Clone)]
pub struct FactProgressInput {
    pub user_id: String,
    pub fact_id: Uuid,
    pub is_completed: bool,
    /// Seconds
    pub time_spent: i64,
}

impl FactProgressInput {
    /// A completed view with no time recorded.
    pub fn new(user_id: impl Into<String>, fact_id: Uuid) -> Self {
        Self {
            user_id: user_id.into(),
            fact_id,
            is_completed: true,
            time_spent: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FlashcardProgressInput {
    pub user_id: String,
    pub flashcard_id: Uuid,
    pub is_completed: bool,
    pub attempts: i32,
    pub time_spent: i64,
}

impl FlashcardProgressInput {
    /// A single completed attempt with no time recorded.
    pub fn new(user_id: impl Into<String>, flashcard_id: Uuid) -> Self {
        Self {
            user_id: user_id.into(),
            flashcard_id,
            is_completed: true,
            attempts: 1,
            time_spent: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub user_id: String,
    pub fact_progress: Vec<FactProgress>,
    pub flashcard_progress: Vec<FlashcardProgress>,
    pub statistics: Statistics,
}

#[derive(Clone)]
pub struct ProgressTracker {
    store: Arc<dyn ContentStore>,
}

impl ProgressTracker {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Record that a user viewed or completed a fact.
    ///
    /// # Errors
    ///
    /// `CoreError::Validation` for a blank user id or a time outside
    /// `0..=MAX_TIME_SPENT_PER_CALL`, `CoreError::NotFound` if the fact does
    /// not exist.
    pub async fn record_fact_progress(
        &self,
        input: FactProgressInput,
    ) -> Result<FactProgress, CoreError> {
        let user_id = validate_user_id(&input.user_id)?;
        validate_time_spent(input.time_spent)?;

        if self.store.find_fact(input.fact_id).await?.is_none() {
            return Err(CoreError::NotFound {
                entity: "fact",
                id: input.fact_id,
            });
        }

        let update = FactProgressUpdate {
            is_completed: input.is_completed,
            time_spent: input.time_spent,
        };

        let progress = self
            .store
            .upsert_fact_progress(user_id, input.fact_id, update)
            .await
            .map_err(|e| missing_reference(e, "fact", input.fact_id))?;

        tracing::debug!(
            user_id,
            fact_id = %input.fact_id,
            is_completed = progress.progress.is_completed,
            time_spent = progress.progress.time_spent,
            "Recorded fact progress"
        );

        Ok(progress)
    }

    /// Record a flashcard attempt.
    ///
    /// # Errors
    ///
    /// `CoreError::Validation` for a blank user id, an out of range time or
    /// `attempts` outside `1..=MAX_ATTEMPTS_PER_CALL`, `CoreError::NotFound`
    /// if the flashcard does not exist.
    pub async fn record_flashcard_progress(
        &self,
        input: FlashcardProgressInput,
    ) -> Result<FlashcardProgress, CoreError> {
        let user_id = validate_user_id(&input.user_id)?;
        validate_time_spent(input.time_spent)?;
        if !(1..=MAX_ATTEMPTS_PER_CALL).contains(&input.attempts) {
            return Err(CoreError::Validation(format!(
                "attempts must be between 1 and {MAX_ATTEMPTS_PER_CALL}"
            )));
        }

        if self.store.find_flashcard(input.flashcard_id).await?.is_none() {
            return Err(CoreError::NotFound {
                entity: "flashcard",
                id: input.flashcard_id,
            });
        }

        let update = FlashcardProgressUpdate {
            is_completed: input.is_completed,
            attempts: input.attempts,
            time_spent: input.time_spent,
        };

        let progress = self
            .store
            .upsert_flashcard_progress(user_id, input.flashcard_id, update)
            .await
            .map_err(|e| missing_reference(e, "flashcard", input.flashcard_id))?;

        tracing::debug!(
            user_id,
            flashcard_id = %input.flashcard_id,
            attempts = progress.progress.attempts,
            is_completed = progress.progress.is_completed,
            "Recorded flashcard progress"
        );

        Ok(progress)
    }

    /// Recent progress for a user and completion statistics over it.
    pub async fn user_progress_summary(
        &self,
        user_id: &str,
        range: DateRange,
    ) -> Result<ProgressSummary, CoreError> {
        let user_id = validate_user_id(user_id)?;
        if range.start.zip(range.end).is_some_and(|(start, end)| start > end) {
            return Err(CoreError::Validation(
                "startDate must not be after endDate".to_string(),
            ));
        }

        let fact_progress = self
            .store
            .recent_fact_progress(user_id, range, SUMMARY_WINDOW)
            .await?;
        let flashcard_progress = self
            .store
            .recent_flashcard_progress(user_id, range, SUMMARY_WINDOW)
            .await?;

        let statistics = Statistics {
            facts: ContentStats::from_flags(fact_progress.iter().map(|p| p.progress.is_completed)),
            flashcards: ContentStats::from_flags(
                flashcard_progress.iter().map(|p| p.progress.is_completed),
            ),
        };

        Ok(ProgressSummary {
            user_id: user_id.to_string(),
            fact_progress,
            flashcard_progress,
            statistics,
        })
    }
}

fn validate_user_id(user_id: &str) -> Result<&str, CoreError> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("userId is required".to_string()));
    }
    if trimmed.chars().count() > MAX_USER_ID_LEN {
        return Err(CoreError::Validation(format!(
            "userId must be at most {MAX_USER_ID_LEN} characters"
        )));
    }
    Ok(trimmed)
}

fn validate_time_spent(time_spent: i64) -> Result<(), CoreError> {
    if !(0..=MAX_TIME_SPENT_PER_CALL).contains(&time_spent) {
        return Err(CoreError::Validation(format!(
            "timeSpent must be between 0 and {MAX_TIME_SPENT_PER_CALL} seconds"
        )));
    }
    Ok(())
}

/// The item can disappear between the existence check and the upsert.
fn missing_reference(err: StoreError, entity: &'static str, id: Uuid) -> CoreError {
    match err {
        StoreError::InvalidReference(_) => CoreError::NotFound { entity, id },
        other => CoreError::Store(other),
    }
}
