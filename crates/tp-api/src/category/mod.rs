mod model;
mod routes;

pub use model::{CategoryStats, CreateCategoryRequest};
pub use routes::routes;
