mod model;
mod routes;

pub use model::{SummaryQuery, TrackFactRequest, TrackFlashcardRequest};
pub use routes::routes;
