use std::sync::Arc;

use tp_core::{ProgressTracker, RandomSampler};
use tp_db::ContentStore;

#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<dyn ContentStore>,
    pub tracker: ProgressTracker,
    pub sampler: RandomSampler,
}

impl ApiState {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self {
            tracker: ProgressTracker::new(Arc::clone(&store)),
            sampler: RandomSampler::new(Arc::clone(&store)),
            store,
        }
    }
}
