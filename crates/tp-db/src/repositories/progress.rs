use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{
    DateRange, FactProgress, FactProgressRow, FactProgressUpdate, FactRef, FlashcardProgress,
    FlashcardProgressRow, FlashcardProgressUpdate, FlashcardRef,
};

#[derive(sqlx::FromRow)]
struct FactProgressJoined {
    #[sqlx(flatten)]
    progress: FactProgressRow,
    fact_title: String,
    fact_category_id: Uuid,
}

impl From<FactProgressJoined> for FactProgress {
    fn from(row: FactProgressJoined) -> Self {
        let fact = FactRef {
            id: row.progress.fact_id,
            title: row.fact_title,
            category_id: row.fact_category_id,
        };
        Self {
            progress: row.progress,
            fact,
        }
    }
}

#[derive(sqlx::FromRow)]
struct FlashcardProgressJoined {
    #[sqlx(flatten)]
    progress: FlashcardProgressRow,
    flashcard_question: String,
    flashcard_category_id: Uuid,
}

impl From<FlashcardProgressJoined> for FlashcardProgress {
    fn from(row: FlashcardProgressJoined) -> Self {
        let flashcard = FlashcardRef {
            id: row.progress.flashcard_id,
            question: row.flashcard_question,
            category_id: row.flashcard_category_id,
        };
        Self {
            progress: row.progress,
            flashcard,
        }
    }
}

/// Insert or merge fact progress in a single statement.
///
/// Mirrors `FactProgressUpdate::merge`: completion is OR-ed and time is added
/// column-relative, so concurrent calls on the same key never lose updates.
pub async fn upsert_fact_progress<'e, E>(
    executor: E,
    user_id: &str,
    fact_id: Uuid,
    update: FactProgressUpdate,
) -> Result<FactProgress, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let row: FactProgressJoined = sqlx::query_as(
        // language=PostgreSQL
        r#"
            WITH upserted AS (
                INSERT INTO user_fact_progress (user_id, fact_id, is_completed, is_viewed, time_spent, viewed_at)
                VALUES ($1, $2, $3, true, $4, NOW())
                ON CONFLICT (user_id, fact_id)
                DO UPDATE SET
                    is_completed = user_fact_progress.is_completed OR EXCLUDED.is_completed,
                    is_viewed = true,
                    time_spent = user_fact_progress.time_spent + EXCLUDED.time_spent,
                    viewed_at = EXCLUDED.viewed_at,
                    updated_at = NOW()
                RETURNING *
            )
            SELECT
                u.id, u.user_id, u.fact_id, u.is_completed, u.is_viewed, u.time_spent,
                u.viewed_at, u.created_at, u.updated_at,
                f.title AS fact_title,
                f.category_id AS fact_category_id
            FROM upserted u
            JOIN facts f ON f.id = u.fact_id
        "#,
    )
    .bind(user_id)
    .bind(fact_id)
    .bind(update.is_completed)
    .bind(update.time_spent)
    .fetch_one(executor)
    .await?;

    Ok(row.into())
}

/// Insert or merge flashcard progress in a single statement.
///
/// `completed_at` is kept through `COALESCE` once set.
pub async fn upsert_flashcard_progress<'e, E>(
    executor: E,
    user_id: &str,
    flashcard_id: Uuid,
    update: FlashcardProgressUpdate,
) -> Result<FlashcardProgress, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let row: FlashcardProgressJoined = sqlx::query_as(
        // language=PostgreSQL
        r#"
            WITH upserted AS (
                INSERT INTO user_flashcard_progress (
                    user_id, flashcard_id, is_completed, attempts, success_count,
                    time_spent, last_attempt_at, completed_at
                )
                VALUES (
                    $1, $2, $3, $4, CASE WHEN $3 THEN 1 ELSE 0 END,
                    $5, NOW(), CASE WHEN $3 THEN NOW() ELSE NULL END
                )
                ON CONFLICT (user_id, flashcard_id)
                DO UPDATE SET
                    is_completed = user_flashcard_progress.is_completed OR EXCLUDED.is_completed,
                    attempts = user_flashcard_progress.attempts + EXCLUDED.attempts,
                    success_count = user_flashcard_progress.success_count + EXCLUDED.success_count,
                    time_spent = user_flashcard_progress.time_spent + EXCLUDED.time_spent,
                    last_attempt_at = EXCLUDED.last_attempt_at,
                    completed_at = COALESCE(user_flashcard_progress.completed_at, EXCLUDED.completed_at),
                    updated_at = NOW()
                RETURNING *
            )
            SELECT
                u.id, u.user_id, u.flashcard_id, u.is_completed, u.attempts, u.success_count,
                u.time_spent, u.last_attempt_at, u.completed_at, u.created_at, u.updated_at,
                fc.question AS flashcard_question,
                fc.category_id AS flashcard_category_id
            FROM upserted u
            JOIN flashcards fc ON fc.id = u.flashcard_id
        "#,
    )
    .bind(user_id)
    .bind(flashcard_id)
    .bind(update.is_completed)
    .bind(update.attempts)
    .bind(update.time_spent)
    .fetch_one(executor)
    .await?;

    Ok(row.into())
}

pub async fn recent_fact_progress<'e, E>(
    executor: E,
    user_id: &str,
    range: DateRange,
    limit: i64,
) -> Result<Vec<FactProgress>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let rows: Vec<FactProgressJoined> = sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT
                p.id, p.user_id, p.fact_id, p.is_completed, p.is_viewed, p.time_spent,
                p.viewed_at, p.created_at, p.updated_at,
                f.title AS fact_title,
                f.category_id AS fact_category_id
            FROM user_fact_progress p
            JOIN facts f ON f.id = p.fact_id
            WHERE p.user_id = $1
                AND ($2::timestamptz IS NULL OR p.viewed_at >= $2)
                AND ($3::timestamptz IS NULL OR p.viewed_at <= $3)
            ORDER BY p.viewed_at DESC, p.id DESC
            LIMIT $4
        "#,
    )
    .bind(user_id)
    .bind(range.start)
    .bind(range.end)
    .bind(limit)
    .fetch_all(executor)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn recent_flashcard_progress<'e, E>(
    executor: E,
    user_id: &str,
    range: DateRange,
    limit: i64,
) -> Result<Vec<FlashcardProgress>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let rows: Vec<FlashcardProgressJoined> = sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT
                p.id, p.user_id, p.flashcard_id, p.is_completed, p.attempts, p.success_count,
                p.time_spent, p.last_attempt_at, p.completed_at, p.created_at, p.updated_at,
                fc.question AS flashcard_question,
                fc.category_id AS flashcard_category_id
            FROM user_flashcard_progress p
            JOIN flashcards fc ON fc.id = p.flashcard_id
            WHERE p.user_id = $1
                AND ($2::timestamptz IS NULL OR p.last_attempt_at >= $2)
                AND ($3::timestamptz IS NULL OR p.last_attempt_at <= $3)
            ORDER BY p.last_attempt_at DESC, p.id DESC
            LIMIT $4
        "#,
    )
    .bind(user_id)
    .bind(range.start)
    .bind(range.end)
    .bind(limit)
    .fetch_all(executor)
    .await?;

    Ok(rows.into_iter().map(Into::into).collect())
}
