mod model;
mod routes;

pub use model::CreateFactRequest;
pub use routes::routes;
