use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{Category, NewCategory};

pub async fn list<'e, E>(executor: E, active_only: bool) -> Result<Vec<Category>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, name, description, color, icon, is_active, created_at, updated_at
            FROM categories
            WHERE (NOT $1 OR is_active)
            ORDER BY name ASC
        "#,
    )
    .bind(active_only)
    .fetch_all(executor)
    .await
}

pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Category>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, name, description, color, icon, is_active, created_at, updated_at
            FROM categories
            WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn insert<'e, E>(executor: E, new: &NewCategory) -> Result<Category, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO categories (name, description, color, icon, is_active)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, description, color, icon, is_active, created_at, updated_at
        "#,
    )
    .bind(&new.name)
    .bind(&new.description)
    .bind(&new.color)
    .bind(&new.icon)
    .bind(new.is_active)
    .fetch_one(executor)
    .await
}
