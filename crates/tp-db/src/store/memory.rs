use std::{
    cmp::Reverse,
    collections::{HashMap, hash_map::Entry},
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::ContentStore;
use crate::{
    error::StoreError,
    models::{
        Category, ContentFilter, DateRange, Fact, FactCounter, FactProgress, FactProgressRow,
        FactProgressUpdate, FactRef, Flashcard, FlashcardProgress, FlashcardProgressRow,
        FlashcardProgressUpdate, FlashcardRef, NewCategory, NewFact, NewFlashcard, Page,
    },
};

#[derive(Default)]
struct Tables {
    categories: HashMap<Uuid, Category>,
    facts: HashMap<Uuid, Fact>,
    flashcards: HashMap<Uuid, Flashcard>,
    fact_progress: HashMap<(String, Uuid), FactProgressRow>,
    flashcard_progress: HashMap<(String, Uuid), FlashcardProgressRow>,
}

/// In-memory content store for tests and local prototyping.
///
/// All tables sit behind one mutex, so every trait method is atomic with
/// respect to every other.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore").finish_non_exhaustive()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

/// Apply the shared newest-first ordering and page window.
fn paginate<T: Clone>(mut items: Vec<&T>, page: Page, key: impl Fn(&T) -> (i64, Uuid)) -> Vec<T> {
    items.sort_by_key(|item| Reverse(key(item)));
    let offset = usize::try_from(page.offset).unwrap_or(0);
    let limit = usize::try_from(page.limit).unwrap_or(0);
    items
        .into_iter()
        .skip(offset)
        .take(limit)
        .cloned()
        .collect()
}

fn to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

fn fact_key(fact: &Fact) -> (i64, Uuid) {
    (fact.created_at.timestamp_nanos_opt().unwrap_or(i64::MAX), fact.id)
}

fn flashcard_key(flashcard: &Flashcard) -> (i64, Uuid) {
    (
        flashcard.created_at.timestamp_nanos_opt().unwrap_or(i64::MAX),
        flashcard.id,
    )
}

fn limit_to_usize(limit: i64) -> usize {
    usize::try_from(limit).unwrap_or(0)
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.lock().map(|_| ())
    }

    async fn list_categories(&self, active_only: bool) -> Result<Vec<Category>, StoreError> {
        let tables = self.lock()?;
        let mut categories: Vec<Category> = tables
            .categories
            .values()
            .filter(|c| !active_only || c.is_active)
            .cloned()
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_category(&self, id: Uuid) -> Result<Option<Category>, StoreError> {
        Ok(self.lock()?.categories.get(&id).cloned())
    }

    async fn create_category(&self, new: NewCategory) -> Result<Category, StoreError> {
        let mut tables = self.lock()?;
        if tables.categories.values().any(|c| c.name == new.name) {
            return Err(StoreError::Conflict(format!(
                "category name '{}' already exists",
                new.name
            )));
        }

        let now = Utc::now();
        let category = Category {
            id: Uuid::new_v4(),
            name: new.name,
            description: new.description,
            color: new.color,
            icon: new.icon,
            is_active: new.is_active,
            created_at: now,
            updated_at: now,
        };
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn count_facts(&self, filter: &ContentFilter) -> Result<i64, StoreError> {
        let tables = self.lock()?;
        let n = tables
            .facts
            .values()
            .filter(|f| filter.matches_fact(f))
            .count();
        Ok(to_i64(n))
    }

    async fn list_facts(
        &self,
        filter: &ContentFilter,
        page: Page,
    ) -> Result<Vec<Fact>, StoreError> {
        let tables = self.lock()?;
        let matching: Vec<&Fact> = tables
            .facts
            .values()
            .filter(|f| filter.matches_fact(f))
            .collect();
        Ok(paginate(matching, page, fact_key))
    }

    async fn find_fact(&self, id: Uuid) -> Result<Option<Fact>, StoreError> {
        Ok(self.lock()?.facts.get(&id).cloned())
    }

    async fn create_fact(&self, new: NewFact) -> Result<Fact, StoreError> {
        let mut tables = self.lock()?;
        if !tables.categories.contains_key(&new.category_id) {
            return Err(StoreError::InvalidReference(format!(
                "category {} does not exist",
                new.category_id
            )));
        }

        let now = Utc::now();
        let fact = Fact {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            fun_fact: new.fun_fact,
            category_id: new.category_id,
            age_group: new.age_group,
            difficulty: new.difficulty,
            image_url: new.image_url,
            is_active: new.is_active,
            view_count: 0,
            likes: 0,
            created_at: now,
            updated_at: now,
        };
        tables.facts.insert(fact.id, fact.clone());
        Ok(fact)
    }

    async fn bump_fact_counter(
        &self,
        id: Uuid,
        counter: FactCounter,
    ) -> Result<Option<Fact>, StoreError> {
        let mut tables = self.lock()?;
        let Some(fact) = tables.facts.get_mut(&id) else {
            return Ok(None);
        };
        let (value, column) = match counter {
            FactCounter::Views => (&mut fact.view_count, "viewCount"),
            FactCounter::Likes => (&mut fact.likes, "likes"),
        };
        *value = value
            .checked_add(1)
            .ok_or_else(|| StoreError::OutOfRange(format!("{column} is out of range")))?;
        fact.updated_at = Utc::now();
        Ok(Some(fact.clone()))
    }

    async fn count_flashcards(&self, filter: &ContentFilter) -> Result<i64, StoreError> {
        let tables = self.lock()?;
        let n = tables
            .flashcards
            .values()
            .filter(|f| filter.matches_flashcard(f))
            .count();
        Ok(to_i64(n))
    }

    async fn list_flashcards(
        &self,
        filter: &ContentFilter,
        page: Page,
    ) -> Result<Vec<Flashcard>, StoreError> {
        let tables = self.lock()?;
        let matching: Vec<&Flashcard> = tables
            .flashcards
            .values()
            .filter(|f| filter.matches_flashcard(f))
            .collect();
        Ok(paginate(matching, page, flashcard_key))
    }

    async fn find_flashcard(&self, id: Uuid) -> Result<Option<Flashcard>, StoreError> {
        Ok(self.lock()?.flashcards.get(&id).cloned())
    }

    async fn create_flashcard(&self, new: NewFlashcard) -> Result<Flashcard, StoreError> {
        let mut tables = self.lock()?;
        if !tables.categories.contains_key(&new.category_id) {
            return Err(StoreError::InvalidReference(format!(
                "category {} does not exist",
                new.category_id
            )));
        }

        let now = Utc::now();
        let flashcard = Flashcard {
            id: Uuid::new_v4(),
            question: new.question,
            answer: new.answer,
            category_id: new.category_id,
            age_group: new.age_group,
            difficulty: new.difficulty,
            question_image: new.question_image,
            answer_image: new.answer_image,
            audio_url: new.audio_url,
            is_active: new.is_active,
            usage_count: 0,
            success_rate: 0.0,
            created_at: now,
            updated_at: now,
        };
        tables.flashcards.insert(flashcard.id, flashcard.clone());
        Ok(flashcard)
    }

    async fn upsert_fact_progress(
        &self,
        user_id: &str,
        fact_id: Uuid,
        update: FactProgressUpdate,
    ) -> Result<FactProgress, StoreError> {
        let mut tables = self.lock()?;
        let fact = tables
            .facts
            .get(&fact_id)
            .map(FactRef::from)
            .ok_or_else(|| StoreError::InvalidReference(format!("fact {fact_id} does not exist")))?;

        let now = Utc::now();
        let row = match tables.fact_progress.entry((user_id.to_string(), fact_id)) {
            Entry::Occupied(mut entry) => {
                update.merge(entry.get_mut(), now)?;
                entry.get().clone()
            }
            Entry::Vacant(entry) => entry.insert(update.new_row(user_id, fact_id, now)?).clone(),
        };

        Ok(FactProgress {
            progress: row,
            fact,
        })
    }

    async fn upsert_flashcard_progress(
        &self,
        user_id: &str,
        flashcard_id: Uuid,
        update: FlashcardProgressUpdate,
    ) -> Result<FlashcardProgress, StoreError> {
        let mut tables = self.lock()?;
        let flashcard = tables
            .flashcards
            .get(&flashcard_id)
            .map(FlashcardRef::from)
            .ok_or_else(|| {
                StoreError::InvalidReference(format!("flashcard {flashcard_id} does not exist"))
            })?;

        let now = Utc::now();
        let row = match tables.flashcard_progress.entry((user_id.to_string(), flashcard_id)) {
            Entry::Occupied(mut entry) => {
                update.merge(entry.get_mut(), now)?;
                entry.get().clone()
            }
            Entry::Vacant(entry) => entry.insert(update.new_row(user_id, flashcard_id, now)?).clone(),
        };

        Ok(FlashcardProgress {
            progress: row,
            flashcard,
        })
    }

    async fn recent_fact_progress(
        &self,
        user_id: &str,
        range: DateRange,
        limit: i64,
    ) -> Result<Vec<FactProgress>, StoreError> {
        let tables = self.lock()?;
        let mut rows: Vec<&FactProgressRow> = tables
            .fact_progress
            .values()
            .filter(|p| p.user_id == user_id && range.contains(p.viewed_at))
            .collect();
        rows.sort_by_key(|p| Reverse((p.viewed_at, p.id)));

        Ok(rows
            .into_iter()
            .take(limit_to_usize(limit))
            .filter_map(|p| {
                let fact = tables.facts.get(&p.fact_id)?;
                Some(FactProgress {
                    progress: p.clone(),
                    fact: FactRef::from(fact),
                })
            })
            .collect())
    }

    async fn recent_flashcard_progress(
        &self,
        user_id: &str,
        range: DateRange,
        limit: i64,
    ) -> Result<Vec<FlashcardProgress>, StoreError> {
        let tables = self.lock()?;
        let mut rows: Vec<&FlashcardProgressRow> = tables
            .flashcard_progress
            .values()
            .filter(|p| p.user_id == user_id && range.contains(p.last_attempt_at))
            .collect();
        rows.sort_by_key(|p| Reverse((p.last_attempt_at, p.id)));

        Ok(rows
            .into_iter()
            .take(limit_to_usize(limit))
            .filter_map(|p| {
                let flashcard = tables.flashcards.get(&p.flashcard_id)?;
                Some(FlashcardProgress {
                    progress: p.clone(),
                    flashcard: FlashcardRef::from(flashcard),
                })
            })
            .collect())
    }
}
