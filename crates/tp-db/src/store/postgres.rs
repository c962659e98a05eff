use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::ContentStore;
use crate::{
    error::StoreError,
    models::{
        Category, ContentFilter, DateRange, Fact, FactCounter, FactProgress, FactProgressUpdate,
        Flashcard, FlashcardProgress, FlashcardProgressUpdate, NewCategory, NewFact, NewFlashcard,
        Page,
    },
    repositories::{category, fact, flashcard, progress},
};

/// PostgreSQL-backed content store
#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ContentStore for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_categories(&self, active_only: bool) -> Result<Vec<Category>, StoreError> {
        Ok(category::list(&self.pool, active_only).await?)
    }

    async fn find_category(&self, id: Uuid) -> Result<Option<Category>, StoreError> {
        Ok(category::find_by_id(&self.pool, id).await?)
    }

    async fn create_category(&self, new: NewCategory) -> Result<Category, StoreError> {
        Ok(category::insert(&self.pool, &new).await?)
    }

    async fn count_facts(&self, filter: &ContentFilter) -> Result<i64, StoreError> {
        Ok(fact::count(&self.pool, filter).await?)
    }

    async fn list_facts(
        &self,
        filter: &ContentFilter,
        page: Page,
    ) -> Result<Vec<Fact>, StoreError> {
        Ok(fact::list(&self.pool, filter, page).await?)
    }

    async fn find_fact(&self, id: Uuid) -> Result<Option<Fact>, StoreError> {
        Ok(fact::find_by_id(&self.pool, id).await?)
    }

    async fn create_fact(&self, new: NewFact) -> Result<Fact, StoreError> {
        Ok(fact::insert(&self.pool, &new).await?)
    }

    async fn bump_fact_counter(
        &self,
        id: Uuid,
        counter: FactCounter,
    ) -> Result<Option<Fact>, StoreError> {
        Ok(fact::increment_counter(&self.pool, id, counter).await?)
    }

    async fn count_flashcards(&self, filter: &ContentFilter) -> Result<i64, StoreError> {
        Ok(flashcard::count(&self.pool, filter).await?)
    }

    async fn list_flashcards(
        &self,
        filter: &ContentFilter,
        page: Page,
    ) -> Result<Vec<Flashcard>, StoreError> {
        Ok(flashcard::list(&self.pool, filter, page).await?)
    }

    async fn find_flashcard(&self, id: Uuid) -> Result<Option<Flashcard>, StoreError> {
        Ok(flashcard::find_by_id(&self.pool, id).await?)
    }

    async fn create_flashcard(&self, new: NewFlashcard) -> Result<Flashcard, StoreError> {
        Ok(flashcard::insert(&self.pool, &new).await?)
    }

    async fn upsert_fact_progress(
        &self,
        user_id: &str,
        fact_id: Uuid,
        update: FactProgressUpdate,
    ) -> Result<FactProgress, StoreError> {
        Ok(progress::upsert_fact_progress(&self.pool, user_id, fact_id, update).await?)
    }

    async fn upsert_flashcard_progress(
        &self,
        user_id: &str,
        flashcard_id: Uuid,
        update: FlashcardProgressUpdate,
    ) -> Result<FlashcardProgress, StoreError> {
        Ok(progress::upsert_flashcard_progress(&self.pool, user_id, flashcard_id, update).await?)
    }

    async fn recent_fact_progress(
        &self,
        user_id: &str,
        range: DateRange,
        limit: i64,
    ) -> Result<Vec<FactProgress>, StoreError> {
        Ok(progress::recent_fact_progress(&self.pool, user_id, range, limit).await?)
    }

    async fn recent_flashcard_progress(
        &self,
        user_id: &str,
        range: DateRange,
        limit: i64,
    ) -> Result<Vec<FlashcardProgress>, StoreError> {
        Ok(progress::recent_flashcard_progress(&self.pool, user_id, range, limit).await?)
    }
}
