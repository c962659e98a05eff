use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use axum_extra::extract::WithRejection;
use serde_json::json;
use tp_db::{
    StoreError,
    models::{Category, ContentFilter},
};
use uuid::Uuid;

use crate::{
    ApiState,
    content::{ListQuery, Pagination},
    error::ApiError,
};

use super::model::{CategoryStats, CreateCategoryRequest};

/// Create the category routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/{id}", get(get_category))
        .route("/categories/{id}/stats", get(get_category_stats))
        .route("/categories/{id}/facts", get(list_category_facts))
        .route("/categories/{id}/flashcards", get(list_category_flashcards))
}

async fn find_category(state: &ApiState, id: Uuid) -> Result<Category, ApiError> {
    state
        .store
        .find_category(id)
        .await?
        .ok_or(ApiError::NotFound {
            entity: "category",
            id,
        })
}

/// Active categories ordered by name
async fn list_categories(State(state): State<ApiState>) -> Result<impl IntoResponse, ApiError> {
    let categories = state.store.list_categories(true).await?;
    Ok(Json(json!({ "categories": categories })))
}

async fn get_category(
    State(state): State<ApiState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<Json<Category>, ApiError> {
    Ok(Json(find_category(&state, id).await?))
}

async fn get_category_stats(
    State(state): State<ApiState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<Json<CategoryStats>, ApiError> {
    let category = find_category(&state, id).await?;

    let filter = ContentFilter {
        category_id: Some(id),
        ..ContentFilter::active()
    };
    let facts_count = state.store.count_facts(&filter).await?;
    let flashcards_count = state.store.count_flashcards(&filter).await?;

    Ok(Json(CategoryStats {
        category_id: category.id,
        category_name: category.name,
        facts_count,
        flashcards_count,
        total_content: facts_count + flashcards_count,
    }))
}

async fn list_category_facts(
    State(state): State<ApiState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Query(query), _): WithRejection<Query<ListQuery>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    find_category(&state, id).await?;

    let (mut filter, page) = query.into_filter_and_page()?;
    filter.category_id = Some(id);

    let total = state.store.count_facts(&filter).await?;
    let facts = state.store.list_facts(&filter, page).await?;

    Ok(Json(json!({
        "facts": facts,
        "pagination": Pagination::new(total, page),
    })))
}

async fn list_category_flashcards(
    State(state): State<ApiState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
    WithRejection(Query(query), _): WithRejection<Query<ListQuery>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    find_category(&state, id).await?;

    let (mut filter, page) = query.into_filter_and_page()?;
    filter.category_id = Some(id);

    let total = state.store.count_flashcards(&filter).await?;
    let flashcards = state.store.list_flashcards(&filter, page).await?;

    Ok(Json(json!({
        "flashcards": flashcards,
        "pagination": Pagination::new(total, page),
    })))
}

async fn create_category(
    State(state): State<ApiState>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateCategoryRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let new = payload.validate()?;
    let name = new.name.clone();

    let category = state
        .store
        .create_category(new)
        .await
        .map_err(|err| match err {
            StoreError::Conflict(_) => {
                ApiError::Conflict(format!("Category '{name}' already exists"))
            }
            other => other.into(),
        })?;

    tracing::info!(category_id = %category.id, name = %category.name, "Category created");

    Ok((StatusCode::CREATED, Json(category)))
}
