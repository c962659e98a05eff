//! Progress tracking and random sampling for TinyPal content.
//!
//! Both services receive their content store explicitly as an
//! `Arc<dyn ContentStore>`; neither keeps state of its own.

pub mod error;
pub mod sampler;
pub mod stats;
pub mod tracker;

pub use error::CoreError;
pub use sampler::{RandomSampler, Sampled};
pub use stats::{ContentStats, Statistics, completion_rate};
pub use tracker::{
    FactProgressInput, FlashcardProgressInput, ProgressSummary, ProgressTracker, SUMMARY_WINDOW,
};
