use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{ContentFilter, Flashcard, NewFlashcard, Page};

pub async fn count<'e, E>(executor: E, filter: &ContentFilter) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT COUNT(*)
            FROM flashcards
            WHERE (NOT $1 OR is_active)
                AND ($2::uuid IS NULL OR category_id = $2)
                AND ($3::age_group IS NULL OR age_group = $3)
                AND ($4::difficulty IS NULL OR difficulty = $4)
                AND ($5::text IS NULL
                    OR strpos(lower(question), lower($5)) > 0
                    OR strpos(lower(answer), lower($5)) > 0)
        "#,
    )
    .bind(filter.active_only)
    .bind(filter.category_id)
    .bind(filter.age_group)
    .bind(filter.difficulty)
    .bind(&filter.search)
    .fetch_one(executor)
    .await
}

/// List flashcards in the stable order the random sampler relies on.
pub async fn list<'e, E>(
    executor: E,
    filter: &ContentFilter,
    page: Page,
) -> Result<Vec<Flashcard>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT
                id, question, answer, category_id, age_group, difficulty,
                question_image, answer_image, audio_url, is_active,
                usage_count, success_rate, created_at, updated_at
            FROM flashcards
            WHERE (NOT $1 OR is_active)
                AND ($2::uuid IS NULL OR category_id = $2)
                AND ($3::age_group IS NULL OR age_group = $3)
                AND ($4::difficulty IS NULL OR difficulty = $4)
                AND ($5::text IS NULL
                    OR strpos(lower(question), lower($5)) > 0
                    OR strpos(lower(answer), lower($5)) > 0)
            ORDER BY created_at DESC, id DESC
            OFFSET $6
            LIMIT $7
        "#,
    )
    .bind(filter.active_only)
    .bind(filter.category_id)
    .bind(filter.age_group)
    .bind(filter.difficulty)
    .bind(&filter.search)
    .bind(page.offset)
    .bind(page.limit)
    .fetch_all(executor)
    .await
}

pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Flashcard>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT
                id, question, answer, category_id, age_group, difficulty,
                question_image, answer_image, audio_url, is_active,
                usage_count, success_rate, created_at, updated_at
            FROM flashcards
            WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn insert<'e, E>(executor: E, new: &NewFlashcard) -> Result<Flashcard, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO flashcards (
                question, answer, category_id, age_group, difficulty,
                question_image, answer_image, audio_url, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING
                id, question, answer, category_id, age_group, difficulty,
                question_image, answer_image, audio_url, is_active,
                usage_count, success_rate, created_at, updated_at
        "#,
    )
    .bind(&new.question)
    .bind(&new.answer)
    .bind(new.category_id)
    .bind(new.age_group)
    .bind(new.difficulty)
    .bind(&new.question_image)
    .bind(&new.answer_image)
    .bind(&new.audio_url)
    .bind(new.is_active)
    .fetch_one(executor)
    .await
}
