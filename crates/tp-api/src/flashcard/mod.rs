mod model;
mod routes;

pub use model::{CreateFlashcardRequest, TextFlashcard};
pub use routes::routes;
