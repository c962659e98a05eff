//! Content store interface.
//!
//! Handlers and the core receive an `Arc<dyn ContentStore>` instead of reaching
//! for a process-wide client. Every method is a single atomic operation against
//! the backing store.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::StoreError,
    models::{
        Category, ContentFilter, DateRange, Fact, FactCounter, FactProgress, FactProgressUpdate,
        Flashcard, FlashcardProgress, FlashcardProgressUpdate, NewCategory, NewFact, NewFlashcard,
        Page,
    },
};

#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Round-trip to the backing store, used by readiness checks.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Categories ordered by name.
    async fn list_categories(&self, active_only: bool) -> Result<Vec<Category>, StoreError>;

    async fn find_category(&self, id: Uuid) -> Result<Option<Category>, StoreError>;

    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the name is already taken.
    async fn create_category(&self, new: NewCategory) -> Result<Category, StoreError>;

    async fn count_facts(&self, filter: &ContentFilter) -> Result<i64, StoreError>;

    /// Facts matching `filter`, newest first with `id` as tie-breaker.
    async fn list_facts(&self, filter: &ContentFilter, page: Page)
    -> Result<Vec<Fact>, StoreError>;

    async fn find_fact(&self, id: Uuid) -> Result<Option<Fact>, StoreError>;

    /// # Errors
    ///
    /// Returns `StoreError::InvalidReference` if the category does not exist.
    async fn create_fact(&self, new: NewFact) -> Result<Fact, StoreError>;

    /// Add one to a fact counter. `None` if the fact does not exist.
    async fn bump_fact_counter(
        &self,
        id: Uuid,
        counter: FactCounter,
    ) -> Result<Option<Fact>, StoreError>;

    async fn count_flashcards(&self, filter: &ContentFilter) -> Result<i64, StoreError>;

    /// Flashcards matching `filter`, in the same stable order as `list_facts`.
    async fn list_flashcards(
        &self,
        filter: &ContentFilter,
        page: Page,
    ) -> Result<Vec<Flashcard>, StoreError>;

    async fn find_flashcard(&self, id: Uuid) -> Result<Option<Flashcard>, StoreError>;

    async fn create_flashcard(&self, new: NewFlashcard) -> Result<Flashcard, StoreError>;

    /// Create the (user, fact) record or merge `update` into it atomically.
    async fn upsert_fact_progress(
        &self,
        user_id: &str,
        fact_id: Uuid,
        update: FactProgressUpdate,
    ) -> Result<FactProgress, StoreError>;

    /// Create the (user, flashcard) record or merge `update` into it atomically.
    async fn upsert_flashcard_progress(
        &self,
        user_id: &str,
        flashcard_id: Uuid,
        update: FlashcardProgressUpdate,
    ) -> Result<FlashcardProgress, StoreError>;

    /// Most recently viewed fact progress for a user, at most `limit` records.
    async fn recent_fact_progress(
        &self,
        user_id: &str,
        range: DateRange,
        limit: i64,
    ) -> Result<Vec<FactProgress>, StoreError>;

    /// Most recently attempted flashcard progress for a user.
    async fn recent_flashcard_progress(
        &self,
        user_id: &str,
        range: DateRange,
        limit: i64,
    ) -> Result<Vec<FlashcardProgress>, StoreError>;
}
