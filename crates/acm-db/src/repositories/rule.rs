use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::AccessControlRule;

pub async fn list_rules<'e, E>(
    executor: E,
    name_filter: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<AccessControlRule>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT *
            FROM access_control_rules
            WHERE deleted_at IS NULL
                AND ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
        "#,
    )
    .bind(name_filter)
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await
}

pub async fn count_rules<'e, E>(
    executor: E,
    name_filter: Option<&str>,
) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT COUNT(*)
            FROM access_control_rules
            WHERE deleted_at IS NULL
                AND ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
        "#,
    )
    .bind(name_filter)
    .fetch_one(executor)
    .await
}

pub async fn find_live_by_id<'e, E>(
    executor: E,
    id: Uuid,
) -> Result<Option<AccessControlRule>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT *
            FROM access_control_rules
            WHERE id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn exists_live<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT EXISTS (
                SELECT 1 FROM access_control_rules
                WHERE id = $1 AND deleted_at IS NULL
            )
        "#,
    )
    .bind(id)
    .fetch_one(executor)
    .await
}

/// Duplicate check among live rules, excluding `exclude` when `Some`.
pub async fn name_exists<'e, E>(
    executor: E,
    name: &str,
    exclude: Option<Uuid>,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT EXISTS (
                SELECT 1 FROM access_control_rules
                WHERE name = $1
                    AND deleted_at IS NULL
                    AND ($2::uuid IS NULL OR id <> $2)
            )
        "#,
    )
    .bind(name)
    .bind(exclude)
    .fetch_one(executor)
    .await
}

pub async fn create_rule<'e, E>(executor: E, name: &str) -> Result<AccessControlRule, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO access_control_rules (name)
            VALUES ($1)
            RETURNING *
        "#,
    )
    .bind(name)
    .fetch_one(executor)
    .await
}

pub async fn update_rule<'e, E>(
    executor: E,
    id: Uuid,
    name: &str,
) -> Result<AccessControlRule, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE access_control_rules
            SET name = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING *
        "#,
    )
    .bind(name)
    .bind(id)
    .fetch_one(executor)
    .await
}

pub async fn hard_delete_rule<'e, E>(executor: E, id: Uuid) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM access_control_rules WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

// --- Group link rows ---

pub async fn get_group_ids_by_rule<'e, E>(
    executor: E,
    rule_id: Uuid,
) -> Result<Vec<Uuid>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT group_id
            FROM access_control_rule_groups
            WHERE rule_id = $1
        "#,
    )
    .bind(rule_id)
    .fetch_all(executor)
    .await
}

pub async fn delete_rule_groups<'e, E>(executor: E, rule_id: Uuid) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM access_control_rule_groups WHERE rule_id = $1
        "#,
    )
    .bind(rule_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

pub async fn insert_rule_groups<'e, E>(
    executor: E,
    rule_id: Uuid,
    group_ids: &[Uuid],
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    if group_ids.is_empty() {
        return Ok(());
    }
    sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO access_control_rule_groups (rule_id, group_id)
            SELECT $1, g FROM UNNEST($2::uuid[]) AS g
        "#,
    )
    .bind(rule_id)
    .bind(group_ids)
    .execute(executor)
    .await?;
    Ok(())
}
