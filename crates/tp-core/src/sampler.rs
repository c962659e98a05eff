//! Uniform random selection over a filtered candidate set.
//!
//! Selection is count-then-fetch: the store counts the matching records, an
//! offset is drawn in `[0, count)` and exactly the record at that offset is
//! fetched. Nothing beyond that single record is loaded.

use std::sync::Arc;

use rand::Rng;
use serde::Serialize;
use tp_db::{
    ContentStore,
    models::{ContentFilter, Fact, Flashcard, Page},
};

use crate::error::CoreError;

/// A randomly chosen item and the size of the set it was drawn from
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sampled<T> {
    pub item: T,
    pub total_available: i64,
}

/// Draw an offset uniformly in `[0, count)`. `None` when there are no candidates.
pub fn draw_offset<R: Rng + ?Sized>(count: i64, rng: &mut R) -> Option<i64> {
    if count <= 0 {
        return None;
    }
    Some(rng.gen_range(0..count))
}

#[derive(Clone)]
pub struct RandomSampler {
    store: Arc<dyn ContentStore>,
}

impl RandomSampler {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Pick one active flashcard matching `filter`.
    ///
    /// Returns `Ok(None)` when nothing matches, or when the candidate set
    /// shrank between the count and the fetch.
    pub async fn sample_flashcard(
        &self,
        filter: ContentFilter,
    ) -> Result<Option<Sampled<Flashcard>>, CoreError> {
        let filter = ContentFilter {
            active_only: true,
            ..filter
        };

        let total = self.store.count_flashcards(&filter).await?;
        let offset = draw_offset(total, &mut rand::thread_rng());
        let Some(offset) = offset else {
            tracing::debug!(?filter, "No flashcard candidates");
            return Ok(None);
        };

        let item = self
            .store
            .list_flashcards(&filter, Page::single(offset))
            .await?
            .into_iter()
            .next();

        if item.is_none() {
            tracing::debug!(offset, total, "Flashcard candidate set changed before fetch");
        }

        Ok(item.map(|item| Sampled {
            item,
            total_available: total,
        }))
    }

    /// Pick one active fact matching `filter`.
    pub async fn sample_fact(
        &self,
        filter: ContentFilter,
    ) -> Result<Option<Sampled<Fact>>, CoreError> {
        let filter = ContentFilter {
            active_only: true,
            ..filter
        };

        let total = self.store.count_facts(&filter).await?;
        let offset = draw_offset(total, &mut rand::thread_rng());
        let Some(offset) = offset else {
            tracing::debug!(?filter, "No fact candidates");
            return Ok(None);
        };

        let item = self
            .store
            .list_facts(&filter, Page::single(offset))
            .await?
            .into_iter()
            .next();

        if item.is_none() {
            tracing::debug!(offset, total, "Fact candidate set changed before fetch");
        }

        Ok(item.map(|item| Sampled {
            item,
            total_available: total,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};
    use tp_db::{
        MemoryStore,
        models::{AgeGroup, DEFAULT_CATEGORY_COLOR, Difficulty, NewCategory, NewFlashcard},
    };
    use uuid::Uuid;

    async fn seed_category(store: &MemoryStore, name: &str) -> Uuid {
        store
            .create_category(NewCategory {
                name: name.to_string(),
                description: None,
                color: DEFAULT_CATEGORY_COLOR.to_string(),
                icon: None,
                is_active: true,
            })
            .await
            .unwrap()
            .id
    }

    async fn seed_flashcard(store: &MemoryStore, category_id: Uuid, question: &str) -> Uuid {
        store
            .create_flashcard(NewFlashcard {
                question: question.to_string(),
                answer: "answer".to_string(),
                category_id,
                age_group: AgeGroup::Preschool,
                difficulty: Difficulty::Easy,
                question_image: None,
                answer_image: None,
                audio_url: None,
                is_active: true,
            })
            .await
            .unwrap()
            .id
    }

    #[test]
    fn test_draw_offset_empty() {
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(draw_offset(0, &mut rng), None);
        assert_eq!(draw_offset(-3, &mut rng), None);
    }

    #[test]
    fn test_draw_offset_single_candidate() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert_eq!(draw_offset(1, &mut rng), Some(0));
        }
    }

    #[test]
    fn test_draw_offset_is_roughly_uniform() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut buckets = [0u32; 4];
        for _ in 0..40_000 {
            let offset = draw_offset(4, &mut rng).unwrap();
            assert!((0..4).contains(&offset));
            buckets[offset as usize] += 1;
        }
        // Expected 10_000 each
        for count in buckets {
            assert!((9_000..11_000).contains(&count), "skewed bucket: {count}");
        }
    }

    #[tokio::test]
    async fn test_sample_empty_store_returns_none() {
        let store = Arc::new(MemoryStore::new());
        let sampler = RandomSampler::new(store);

        assert!(sampler.sample_flashcard(ContentFilter::default()).await.unwrap().is_none());
        assert!(sampler.sample_fact(ContentFilter::default()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sample_single_candidate_always_returned() {
        let store = Arc::new(MemoryStore::new());
        let category_id = seed_category(&store, "Animals").await;
        let flashcard_id = seed_flashcard(&store, category_id, "What does a cow say?").await;
        let sampler = RandomSampler::new(store);

        for _ in 0..20 {
            let sampled = sampler
                .sample_flashcard(ContentFilter::default())
                .await
                .unwrap()
                .unwrap();
            assert_eq!(sampled.item.id, flashcard_id);
            assert_eq!(sampled.total_available, 1);
        }
    }

    #[tokio::test]
    async fn test_sample_respects_category_filter() {
        let store = Arc::new(MemoryStore::new());
        let animals = seed_category(&store, "Animals").await;
        let space = seed_category(&store, "Space").await;
        seed_flashcard(&store, animals, "What does a cow say?").await;
        let sampler = RandomSampler::new(store);

        let filter = ContentFilter {
            category_id: Some(space),
            ..ContentFilter::default()
        };
        assert!(sampler.sample_flashcard(filter).await.unwrap().is_none());

        let filter = ContentFilter {
            category_id: Some(animals),
            ..ContentFilter::default()
        };
        assert!(sampler.sample_flashcard(filter).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_sample_covers_every_candidate() {
        let store = Arc::new(MemoryStore::new());
        let category_id = seed_category(&store, "Colors").await;
        let mut ids = Vec::new();
        for question in ["Red?", "Blue?", "Green?"] {
            ids.push(seed_flashcard(&store, category_id, question).await);
        }
        let sampler = RandomSampler::new(store);

        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            let sampled = sampler
                .sample_flashcard(ContentFilter::default())
                .await
                .unwrap()
                .unwrap();
            assert_eq!(sampled.total_available, 3);
            seen.insert(sampled.item.id);
        }
        // (2/3)^200 chance per id of never being drawn
        assert_eq!(seen.len(), ids.len());
    }
}
