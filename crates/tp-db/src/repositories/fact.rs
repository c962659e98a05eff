use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{ContentFilter, Fact, FactCounter, NewFact, Page};

pub async fn count<'e, E>(executor: E, filter: &ContentFilter) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT COUNT(*)
            FROM facts
            WHERE (NOT $1 OR is_active)
                AND ($2::uuid IS NULL OR category_id = $2)
                AND ($3::age_group IS NULL OR age_group = $3)
                AND ($4::difficulty IS NULL OR difficulty = $4)
                AND ($5::text IS NULL
                    OR strpos(lower(title), lower($5)) > 0
                    OR strpos(lower(description), lower($5)) > 0)
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

pub async fn list<'e, E>(
    executor: E,
    filter: &ContentFilter,
    page: Page,
) -> Result<Vec<Fact>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT
                id, title, description, fun_fact, category_id, age_group, difficulty,
                image_url, is_active, view_count, likes, created_at, updated_at
            FROM facts
            WHERE (NOT $1 OR is_active)
                AND ($2::uuid IS NULL OR category_id = $2)
                AND ($3::age_group IS NULL OR age_group = $3)
                AND ($4::difficulty IS NULL OR difficulty = $4)
                AND ($5::text IS NULL
                    OR strpos(lower(title), lower($5)) > 0
                    OR strpos(lower(description), lower($5)) > 0)
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

pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Fact>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT
                id, title, description, fun_fact, category_id, age_group, difficulty,
                image_url, is_active, view_count, likes, created_at, updated_at
            FROM facts
            WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn insert<'e, E>(executor: E, new: &NewFact) -> Result<Fact, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO facts (
                title, description, fun_fact, category_id, age_group, difficulty,
                image_url, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING
                id, title, description, fun_fact, category_id, age_group, difficulty,
                image_url, is_active, view_count, likes, created_at, updated_at
        "#,
    )
    .bind(&new.title)
    .bind(&new.description)
    .bind(&new.fun_fact)
    .bind(new.category_id)
    .bind(new.age_group)
    .bind(new.difficulty)
    .bind(&new.image_url)
    .bind(new.is_active)
    .fetch_one(executor)
    .await
}

/// Atomically add one to a fact's view or like counter.
pub async fn increment_counter<'e, E>(
    executor: E,
    id: Uuid,
    counter: FactCounter,
) -> Result<Option<Fact>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let (views, likes) = match counter {
        FactCounter::Views => (1, 0),
        FactCounter::Likes => (0, 1),
    };

    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE facts
            SET view_count = view_count + $2,
                likes = likes + $3,
                updated_at = NOW()
            WHERE id = $1
            RETURNING
                id, title, description, fun_fact, category_id, age_group, difficulty,
                image_url, is_active, view_count, likes, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(views)
    .bind(likes)
    .fetch_optional(executor)
    .await
}
