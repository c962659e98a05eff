pub mod category;
pub mod config;
pub mod content;
pub mod error;
pub mod fact;
pub mod flashcard;
pub mod metrics;
pub mod middleware;
pub mod progress;
pub mod router;
pub mod state;
pub mod tracing;
pub mod v1;
pub mod validation;

pub use config::ApiConfig;
pub use state::ApiState;
