use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{AccessControlGroup, GroupDevice, GroupSchedule, NewGroupSchedule};

pub async fn list_groups<'e, E>(
    executor: E,
    name_filter: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<AccessControlGroup>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT *
            FROM access_control_groups
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

pub async fn count_groups<'e, E>(
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
            FROM access_control_groups
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
) -> Result<Option<AccessControlGroup>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT *
            FROM access_control_groups
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
                SELECT 1 FROM access_control_groups
                WHERE id = $1 AND deleted_at IS NULL
            )
        "#,
    )
    .bind(id)
    .fetch_one(executor)
    .await
}

/// Duplicate check among live groups. `exclude` skips the row being updated;
/// `None` means no exclusion.
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
                SELECT 1 FROM access_control_groups
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

pub async fn create_group<'e, E>(
    executor: E,
    name: &str,
) -> Result<AccessControlGroup, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO access_control_groups (name)
            VALUES ($1)
            RETURNING *
        "#,
    )
    .bind(name)
    .fetch_one(executor)
    .await
}

pub async fn update_group<'e, E>(
    executor: E,
    id: Uuid,
    name: &str,
) -> Result<AccessControlGroup, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE access_control_groups
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

pub async fn hard_delete_group<'e, E>(executor: E, id: Uuid) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM access_control_groups WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

// --- Device membership rows ---

pub async fn get_device_ids_by_group<'e, E>(
    executor: E,
    group_id: Uuid,
) -> Result<Vec<Uuid>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT device_id
            FROM access_control_group_devices
            WHERE group_id = $1
        "#,
    )
    .bind(group_id)
    .fetch_all(executor)
    .await
}

pub async fn get_group_devices<'e, E>(
    executor: E,
    group_id: Uuid,
) -> Result<Vec<GroupDevice>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, group_id, device_id
            FROM access_control_group_devices
            WHERE group_id = $1
        "#,
    )
    .bind(group_id)
    .fetch_all(executor)
    .await
}

pub async fn delete_group_devices<'e, E>(executor: E, group_id: Uuid) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM access_control_group_devices WHERE group_id = $1
        "#,
    )
    .bind(group_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

pub async fn insert_group_devices<'e, E>(
    executor: E,
    group_id: Uuid,
    device_ids: &[Uuid],
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    if device_ids.is_empty() {
        return Ok(());
    }
    sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO access_control_group_devices (group_id, device_id)
            SELECT $1, d FROM UNNEST($2::uuid[]) AS d
        "#,
    )
    .bind(group_id)
    .bind(device_ids)
    .execute(executor)
    .await?;
    Ok(())
}

// --- Schedule rows ---

pub async fn get_schedules_by_group<'e, E>(
    executor: E,
    group_id: Uuid,
) -> Result<Vec<GroupSchedule>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, group_id, day_of_week, date, start_time, end_time
            FROM access_control_group_schedules
            WHERE group_id = $1
            ORDER BY day_of_week, date
        "#,
    )
    .bind(group_id)
    .fetch_all(executor)
    .await
}

pub async fn delete_group_schedules<'e, E>(executor: E, group_id: Uuid) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM access_control_group_schedules WHERE group_id = $1
        "#,
    )
    .bind(group_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

pub async fn insert_group_schedules<'e, E>(
    executor: E,
    group_id: Uuid,
    schedules: &[NewGroupSchedule],
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    if schedules.is_empty() {
        return Ok(());
    }
    let days: Vec<i32> = schedules.iter().map(|s| s.day_of_week).collect();
    let dates: Vec<Option<chrono::NaiveDate>> = schedules.iter().map(|s| s.date).collect();
    let starts: Vec<chrono::NaiveTime> = schedules.iter().map(|s| s.start_time).collect();
    let ends: Vec<chrono::NaiveTime> = schedules.iter().map(|s| s.end_time).collect();

    sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO access_control_group_schedules
                (group_id, day_of_week, date, start_time, end_time)
            SELECT $1, t.day, t.date, t.start_time, t.end_time
            FROM UNNEST($2::int4[], $3::date[], $4::time[], $5::time[])
                AS t(day, date, start_time, end_time)
        "#,
    )
    .bind(group_id)
    .bind(&days)
    .bind(&dates)
    .bind(&starts)
    .bind(&ends)
    .execute(executor)
    .await?;
    Ok(())
}
