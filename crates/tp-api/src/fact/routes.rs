use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::WithRejection;
use serde_json::json;
use tp_db::{
    StoreError,
    models::{Fact, FactCounter},
};
use uuid::Uuid;

use crate::{
    ApiState,
    content::{FilterQuery, ListQuery, Pagination, WithCategory, with_categories, with_category},
    error::ApiError,
    metrics,
};

use super::model::CreateFactRequest;

/// Create the fact routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/facts", get(list_facts).post(create_fact))
        .route("/facts/random", get(random_fact))
        .route("/facts/{id}", get(get_fact))
        .route("/facts/{id}/view", post(view_fact))
        .route("/facts/{id}/like", post(like_fact))
}

async fn list_facts(
    State(state): State<ApiState>,
    WithRejection(Query(query), _): WithRejection<Query<ListQuery>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let (filter, page) = query.into_filter_and_page()?;

    let total = state.store.count_facts(&filter).await?;
    let facts = state.store.list_facts(&filter, page).await?;
    let facts = with_categories(state.store.as_ref(), facts, |f| f.category_id).await?;

    Ok(Json(json!({
        "facts": facts,
        "pagination": Pagination::new(total, page),
    })))
}

async fn random_fact(
    State(state): State<ApiState>,
    WithRejection(Query(query), _): WithRejection<Query<FilterQuery>, ApiError>,
) -> Result<Json<WithCategory<Fact>>, ApiError> {
    let sampled = state.sampler.sample_fact(query.into_filter()).await?;
    metrics::record_sample("fact", sampled.is_some());

    let fact = sampled
        .ok_or(ApiError::NoMatch("No facts found matching criteria"))?
        .item;
    let category_id = fact.category_id;

    Ok(Json(with_category(state.store.as_ref(), fact, category_id).await?))
}

async fn get_fact(
    State(state): State<ApiState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<Json<WithCategory<Fact>>, ApiError> {
    let fact = state
        .store
        .find_fact(id)
        .await?
        .ok_or(ApiError::NotFound { entity: "fact", id })?;
    let category_id = fact.category_id;

    Ok(Json(with_category(state.store.as_ref(), fact, category_id).await?))
}

async fn create_fact(
    State(state): State<ApiState>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateFactRequest>, ApiError>,
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

    let fact = state
        .store
        .create_fact(new)
        .await
        .map_err(|err| match err {
            StoreError::InvalidReference(_) => missing_category,
            other => other.into(),
        })?;

    tracing::info!(fact_id = %fact.id, %category_id, "Fact created");

    let fact = with_category(state.store.as_ref(), fact, category_id).await?;
    Ok((StatusCode::CREATED, Json(fact)))
}

async fn bump(state: &ApiState, id: Uuid, counter: FactCounter) -> Result<Json<Fact>, ApiError> {
    let fact = state
        .store
        .bump_fact_counter(id, counter)
        .await?
        .ok_or(ApiError::NotFound { entity: "fact", id })?;

    Ok(Json(fact))
}

async fn view_fact(
    State(state): State<ApiState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<Json<Fact>, ApiError> {
    bump(&state, id, FactCounter::Views).await
}

async fn like_fact(
    State(state): State<ApiState>,
    WithRejection(Path(id), _): WithRejection<Path<Uuid>, ApiError>,
) -> Result<Json<Fact>, ApiError> {
    bump(&state, id, FactCounter::Likes).await
}
