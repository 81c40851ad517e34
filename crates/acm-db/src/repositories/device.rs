use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{AccessControlDevice, NewDevice};

pub async fn list_devices<'e, E>(
    executor: E,
    name_filter: Option<&str>,
    status_filter: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<AccessControlDevice>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT *
            FROM access_control_devices
            WHERE deleted_at IS NULL
                AND ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
                AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
        "#,
    )
    .bind(name_filter)
    .bind(status_filter)
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await
}

pub async fn count_devices<'e, E>(
    executor: E,
    name_filter: Option<&str>,
    status_filter: Option<&str>,
) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT COUNT(*)
            FROM access_control_devices
            WHERE deleted_at IS NULL
                AND ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
                AND ($2::text IS NULL OR status = $2)
        "#,
    )
    .bind(name_filter)
    .bind(status_filter)
    .fetch_one(executor)
    .await
}

pub async fn find_live_by_id<'e, E>(
    executor: E,
    id: Uuid,
) -> Result<Option<AccessControlDevice>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT *
            FROM access_control_devices
            WHERE id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Reference-validation probe used by the group association replacer.
pub async fn exists_live<'e, E>(executor: E, id: Uuid) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT EXISTS (
                SELECT 1 FROM access_control_devices
                WHERE id = $1 AND deleted_at IS NULL
            )
        "#,
    )
    .bind(id)
    .fetch_one(executor)
    .await
}

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
                SELECT 1 FROM access_control_devices
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

pub async fn host_address_exists<'e, E>(
    executor: E,
    host_address: &str,
    exclude: Option<Uuid>,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT EXISTS (
                SELECT 1 FROM access_control_devices
                WHERE host_address = $1
                    AND deleted_at IS NULL
                    AND ($2::uuid IS NULL OR id <> $2)
            )
        "#,
    )
    .bind(host_address)
    .bind(exclude)
    .fetch_one(executor)
    .await
}

pub async fn create_device<'e, E>(
    executor: E,
    device: &NewDevice,
) -> Result<AccessControlDevice, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO access_control_devices
                (name, device_type, host_address, username, password, access_token,
                 api_token, server_id, record_scan, record_attendance,
                 allow_clock_in, allow_clock_out, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
        "#,
    )
    .bind(&device.name)
    .bind(&device.device_type)
    .bind(&device.host_address)
    .bind(&device.username)
    .bind(&device.password)
    .bind(&device.access_token)
    .bind(&device.api_token)
    .bind(device.server_id)
    .bind(device.record_scan)
    .bind(device.record_attendance)
    .bind(device.allow_clock_in)
    .bind(device.allow_clock_out)
    .bind(&device.status)
    .fetch_one(executor)
    .await
}

pub async fn update_device<'e, E>(
    executor: E,
    id: Uuid,
    device: &NewDevice,
) -> Result<AccessControlDevice, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE access_control_devices
            SET name = $1, device_type = $2, host_address = $3, username = $4,
                password = $5, access_token = $6, api_token = $7, server_id = $8,
                record_scan = $9, record_attendance = $10, allow_clock_in = $11,
                allow_clock_out = $12, status = $13, updated_at = NOW()
            WHERE id = $14
            RETURNING *
        "#,
    )
    .bind(&device.name)
    .bind(&device.device_type)
    .bind(&device.host_address)
    .bind(&device.username)
    .bind(&device.password)
    .bind(&device.access_token)
    .bind(&device.api_token)
    .bind(device.server_id)
    .bind(device.record_scan)
    .bind(device.record_attendance)
    .bind(device.allow_clock_in)
    .bind(device.allow_clock_out)
    .bind(&device.status)
    .bind(id)
    .fetch_one(executor)
    .await
}

pub async fn soft_delete_device<'e, E>(executor: E, id: Uuid) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            UPDATE access_control_devices
            SET deleted_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}
