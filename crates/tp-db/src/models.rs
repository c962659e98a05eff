use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;

/// Default category color when none is supplied.
pub const DEFAULT_CATEGORY_COLOR: &str = "#3B82F6";

/// Target audience of a piece of content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "age_group", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgeGroup {
    Toddler,
    Preschool,
    Kindergarten,
    EarlyGrade,
    Elementary,
    MiddleSchool,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "difficulty", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

/// Category model - groups facts and flashcards
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Unique category identifier
    pub id: Uuid,
    /// Category name (unique, max 100 chars)
    pub name: String,
    /// Optional description (max 500 chars)
    pub description: Option<String>,
    /// Hex color, e.g. `#3B82F6`
    pub color: String,
    /// Optional icon (usually an emoji)
    pub icon: Option<String>,
    /// Inactive categories are hidden from listings
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Subset of a category embedded into content responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub id: Uuid,
    pub name: String,
    pub color: String,
    pub icon: Option<String>,
}

impl From<&Category> for CategorySummary {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            color: category.color.clone(),
            icon: category.icon.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
    pub color: String,
    pub icon: Option<String>,
    pub is_active: bool,
}

/// Fact model - a short piece of educational content
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Fact {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub fun_fact: Option<String>,
    /// Category this fact belongs to (indexed)
    pub category_id: Uuid,
    pub age_group: AgeGroup,
    pub difficulty: Difficulty,
    pub image_url: Option<String>,
    pub is_active: bool,
    /// Only mutated by view tracking
    pub view_count: i32,
    /// Only mutated by like tracking
    pub likes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFact {
    pub title: String,
    pub description: String,
    pub fun_fact: Option<String>,
    pub category_id: Uuid,
    pub age_group: AgeGroup,
    pub difficulty: Difficulty,
    pub image_url: Option<String>,
    pub is_active: bool,
}

/// Engagement counters on a fact that can be bumped atomically
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactCounter {
    Views,
    Likes,
}

/// Flashcard model - question/answer pair
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
    /// Category this flashcard belongs to (indexed)
    pub category_id: Uuid,
    pub age_group: AgeGroup,
    pub difficulty: Difficulty,
    pub question_image: Option<String>,
    pub answer_image: Option<String>,
    pub audio_url: Option<String>,
    pub is_active: bool,
    pub usage_count: i32,
    pub success_rate: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFlashcard {
    pub question: String,
    pub answer: String,
    pub category_id: Uuid,
    pub age_group: AgeGroup,
    pub difficulty: Difficulty,
    pub question_image: Option<String>,
    pub answer_image: Option<String>,
    pub audio_url: Option<String>,
    pub is_active: bool,
}

/// Filters shared by fact and flashcard queries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentFilter {
    pub category_id: Option<Uuid>,
    pub age_group: Option<AgeGroup>,
    pub difficulty: Option<Difficulty>,
    /// Case-insensitive substring match on the text fields
    pub search: Option<String>,
    pub active_only: bool,
}

impl ContentFilter {
    /// Filter matching every active item.
    pub fn active() -> Self {
        Self {
            active_only: true,
            ..Self::default()
        }
    }

    pub fn matches_fact(&self, fact: &Fact) -> bool {
        self.matches(
            fact.category_id,
            fact.age_group,
            fact.difficulty,
            fact.is_active,
            [fact.title.as_str(), fact.description.as_str()],
        )
    }

    pub fn matches_flashcard(&self, flashcard: &Flashcard) -> bool {
        self.matches(
            flashcard.category_id,
            flashcard.age_group,
            flashcard.difficulty,
            flashcard.is_active,
            [flashcard.question.as_str(), flashcard.answer.as_str()],
        )
    }

    fn matches(
        &self,
        category_id: Uuid,
        age_group: AgeGroup,
        difficulty: Difficulty,
        is_active: bool,
        text: [&str; 2],
    ) -> bool {
        if self.active_only && !is_active {
            return false;
        }
        if self.category_id.is_some_and(|id| id != category_id) {
            return false;
        }
        if self.age_group.is_some_and(|a| a != age_group) {
            return false;
        }
        if self.difficulty.is_some_and(|d| d != difficulty) {
            return false;
        }
        match &self.search {
            Some(needle) => {
                let needle = needle.to_lowercase();
                text.iter().any(|t| t.to_lowercase().contains(&needle))
            }
            None => true,
        }
    }
}

/// Offset window into an ordered result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: i64,
    pub limit: i64,
}

impl Page {
    pub const fn new(offset: i64, limit: i64) -> Self {
        Self { offset, limit }
    }

    /// The single record at `offset`.
    pub const fn single(offset: i64) -> Self {
        Self { offset, limit: 1 }
    }
}

/// Inclusive timestamp bounds; either side may be open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| at >= start) && self.end.is_none_or(|end| at <= end)
    }
}

/// Reference to the fact a progress record points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactRef {
    pub id: Uuid,
    pub title: String,
    pub category_id: Uuid,
}

impl From<&Fact> for FactRef {
    fn from(fact: &Fact) -> Self {
        Self {
            id: fact.id,
            title: fact.title.clone(),
            category_id: fact.category_id,
        }
    }
}

/// Reference to the flashcard a progress record points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardRef {
    pub id: Uuid,
    pub question: String,
    pub category_id: Uuid,
}

impl From<&Flashcard> for FlashcardRef {
    fn from(flashcard: &Flashcard) -> Self {
        Self {
            id: flashcard.id,
            question: flashcard.question.clone(),
            category_id: flashcard.category_id,
        }
    }
}

/// User fact progress - one row per (user_id, fact_id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FactProgressRow {
    pub id: Uuid,
    /// Free-form caller-supplied user identifier
    pub user_id: String,
    pub fact_id: Uuid,
    /// Monotonic: never goes back to false
    pub is_completed: bool,
    pub is_viewed: bool,
    /// Accumulated seconds
    pub time_spent: i64,
    pub viewed_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fact progress together with the fact it references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactProgress {
    #[serde(flatten)]
    pub progress: FactProgressRow,
    pub fact: FactRef,
}

/// User flashcard progress - one row per (user_id, flashcard_id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardProgressRow {
    pub id: Uuid,
    pub user_id: String,
    pub flashcard_id: Uuid,
    pub is_completed: bool,
    /// Sum of all attempt increments
    pub attempts: i32,
    /// Number of tracking calls that reported completion
    pub success_count: i32,
    pub time_spent: i64,
    pub last_attempt_at: DateTime<Utc>,
    /// Set on the first transition to completed, never cleared
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardProgress {
    #[serde(flatten)]
    pub progress: FlashcardProgressRow,
    pub flashcard: FlashcardRef,
}

/// Incoming fact tracking call, folded into the stored record.
///
/// The PostgreSQL store expresses the same rules in its
/// `ON CONFLICT DO UPDATE` clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactProgressUpdate {
    pub is_completed: bool,
    pub time_spent: i64,
}

impl FactProgressUpdate {
    /// Build the record created by the first tracking call for a key.
    pub fn new_row(
        &self,
        user_id: &str,
        fact_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<FactProgressRow, StoreError> {
        let mut row = FactProgressRow {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            fact_id,
            is_completed: false,
            is_viewed: false,
            time_spent: 0,
            viewed_at: now,
            created_at: now,
            updated_at: now,
        };
        self.merge(&mut row, now)?;
        Ok(row)
    }

    /// Merge into an existing record: completion is OR-ed, time accumulates.
    ///
    /// # Errors
    ///
    /// `StoreError::OutOfRange` if the accumulated time would overflow; the
    /// record is left unchanged.
    pub fn merge(&self, row: &mut FactProgressRow, now: DateTime<Utc>) -> Result<(), StoreError> {
        let time_spent = row
            .time_spent
            .checked_add(self.time_spent)
            .ok_or_else(|| out_of_range("timeSpent"))?;

        row.is_completed |= self.is_completed;
        row.is_viewed = true;
        row.time_spent = time_spent;
        row.viewed_at = now;
        row.updated_at = now;
        Ok(())
    }
}

/// Incoming flashcard tracking call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashcardProgressUpdate {
    pub is_completed: bool,
    pub attempts: i32,
    pub time_spent: i64,
}

impl FlashcardProgressUpdate {
    pub fn new_row(
        &self,
        user_id: &str,
        flashcard_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<FlashcardProgressRow, StoreError> {
        let mut row = FlashcardProgressRow {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            flashcard_id,
            is_completed: false,
            attempts: 0,
            success_count: 0,
            time_spent: 0,
            last_attempt_at: now,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };
        self.merge(&mut row, now)?;
        Ok(row)
    }

    /// Merge into an existing record: attempts and time accumulate,
    /// completion is OR-ed and `completed_at` is only ever set once.
    ///
    /// # Errors
    ///
    /// `StoreError::OutOfRange` if a counter would overflow; the record is
    /// left unchanged.
    pub fn merge(
        &self,
        row: &mut FlashcardProgressRow,
        now: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let attempts = row
            .attempts
            .checked_add(self.attempts)
            .ok_or_else(|| out_of_range("attempts"))?;
        let success_count = if self.is_completed {
            row.success_count
                .checked_add(1)
                .ok_or_else(|| out_of_range("successCount"))?
        } else {
            row.success_count
        };
        let time_spent = row
            .time_spent
            .checked_add(self.time_spent)
            .ok_or_else(|| out_of_range("timeSpent"))?;

        row.is_completed |= self.is_completed;
        row.attempts = attempts;
        row.success_count = success_count;
        row.time_spent = time_spent;
        row.last_attempt_at = now;
        if row.is_completed && row.completed_at.is_none() {
            row.completed_at = Some(now);
        }
        row.updated_at = now;
        Ok(())
    }
}

fn out_of_range(field: &str) -> StoreError {
    StoreError::OutOfRange(format!("{field} is out of range"))
}
