use axum::Router;

use crate::{category, fact, flashcard, progress, state::ApiState};

/// Content and progress routes, mounted under `/api`
pub fn routes() -> Router<ApiState> {
    Router::new()
        .merge(category::routes())
        .merge(fact::routes())
        .merge(flashcard::routes())
        .merge(progress::routes())
}
