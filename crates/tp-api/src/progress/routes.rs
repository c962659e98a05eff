use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::WithRejection;
use tp_core::ProgressSummary;

use crate::{ApiState, error::ApiError, metrics};

use super::model::{SummaryQuery, TrackFactRequest, TrackFlashcardRequest};

/// Create the progress routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/progress/facts", post(track_fact))
        .route("/progress/flashcards", post(track_flashcard))
        .route("/progress/{user_id}", get(get_user_progress))
}

async fn track_fact(
    State(state): State<ApiState>,
    WithRejection(Json(payload), _): WithRejection<Json<TrackFactRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let is_completed = payload.is_completed;
    let progress = state.tracker.record_fact_progress(payload.into()).await?;
    metrics::record_progress_event("fact", is_completed);

    Ok((StatusCode::CREATED, Json(progress)))
}

async fn track_flashcard(
    State(state): State<ApiState>,
    WithRejection(Json(payload), _): WithRejection<Json<TrackFlashcardRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let is_completed = payload.is_completed;
    let progress = state
        .tracker
        .record_flashcard_progress(payload.into())
        .await?;
    metrics::record_progress_event("flashcard", is_completed);

    Ok((StatusCode::CREATED, Json(progress)))
}

/// Recent progress and completion statistics for a user
async fn get_user_progress(
    State(state): State<ApiState>,
    WithRejection(Path(user_id), _): WithRejection<Path<String>, ApiError>,
    WithRejection(Query(query), _): WithRejection<Query<SummaryQuery>, ApiError>,
) -> Result<Json<ProgressSummary>, ApiError> {
    let range = query.date_range()?;
    let summary = state.tracker.user_progress_summary(&user_id, range).await?;

    Ok(Json(summary))
}
