use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_extra::extract::WithRejection;
use serde_json::json;
use tp_db::{StoreError, models::Flashcard};
use uuid::Uuid;

use crate::{
    ApiState,
    content::{FilterQuery, ListQuery, Pagination, WithCategory, with_categories, with_category},
    error::ApiError,
    metrics,
};

use super::model::{CreateFlashcardRequest, TextFlashcard};

/// Create the flashcard routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/flashcards", get(list_flashcards).post(create_flashcard))
        .route("/flashcards/random", get(random_flashcard))
        .route("/flashcards/text/random", get(random_text_flashcard))
        .route("/flashcards/{id}", get(get_flashcard))
}

async fn list_flashcards(
    State(state): State<ApiState>,
    WithRejection(Query(query), _): WithRejection<Query<ListQuery>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let (filter, page) = query.into_filter_and_page()?;

    let total = state.store.count_flashcards(&filter).await?;
    let flashcards = state.store.list_flashcards(&filter, page).await?;
    let flashcards = with_categories(state.store.as_ref(), flashcards, |f| f.category_id).await?;

    Ok(Json(json!({
        "flashcards": flashcards,
        "pagination": Pagination::new(total, page),
    })))
}

/// Uniformly random active flashcard matching the filter
async fn random_flashcard(
    State(state): State<ApiState>,
    WithRejection(Query(query), _): WithRejection<Query<FilterQuery>, ApiError>,
) -> Result<Json<WithCategory<Flashcard>>, ApiError> {
    let sampled = state.sampler.sample_flashcard(query.into_filter()).await?;
    metrics::record_sample("flashcard", sampled.is_some());

    let flashcard = sampled
        .ok_or(ApiError::NoMatch("No flashcards found matching criteria"))?
        .item;
    let category_id = flashcard.category_id;

    Ok(Json(
        with_category(state.store.as_ref(), flashcard, category_id).await?,
    ))
}

/// Random flashcard reduced to question and answer
///
/// An empty candidate set is a normal response here, not a 404.
async fn random_text_flashcard(
    State(state): State<ApiState>,
    WithRejection(Query(query), _): WithRejection<Query<FilterQuery>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let sampled = state.sampler.sample_flashcard(query.into_filter()).await?;
    metrics::record_sample("text_flashcard", sampled.is_some());

    let body = match sampled {
        Some(sampled) => json!({
            "textFlashcard": TextFlashcard::from(sampled.item),
            "totalAvailable": sampled.total_available,
        }),
        None => json!({
            "textFlashcard": null,
            "message": "No text flashcards available",
        }),
    };

    Ok(Json(body))
}

async fn get_flashcard(
    State(state): State<ApiState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<Json<WithCategory<Flashcard>>, ApiError> {
    let flashcard = state
        .store
        .find_flashcard(id)
        .await?
        .ok_or(ApiError::NotFound {
            entity: "flashcard",
            id,
        })?;
    let category_id = flashcard.category_id;

    Ok(Json(
        with_category(state.store.as_ref(), flashcard, category_id).await?,
    ))
}

async fn create_flashcard(
    State(state): State<ApiState>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateFlashcardRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let new = payload.validate()?;
    let category_id = new.category_id;

    let missing_category = ApiError::InvalidReference {
        entity: "category",
        id: category_id,
    };
    if state.store.find_category(category_id).await?.is_none() {
        return Err(missing_category);
    }

    let flashcard = state
        .store
        .create_flashcard(new)
        .await
        .map_err(|err| match err {
            StoreError::InvalidReference(_) => missing_category,
            other => other.into(),
        })?;

    tracing::info!(flashcard_id = %flashcard.id, %category_id, "Flashcard created");

    let flashcard = with_category(state.store.as_ref(), flashcard, category_id).await?;
    Ok((StatusCode::CREATED, Json(flashcard)))
}
