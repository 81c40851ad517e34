use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{AccessControlServer, NewServer};

pub async fn list_servers<'e, E>(
    executor: E,
    name_filter: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<AccessControlServer>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT *
            FROM access_control_servers
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

pub async fn count_servers<'e, E>(
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
            FROM access_control_servers
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
) -> Result<Option<AccessControlServer>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT *
            FROM access_control_servers
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
                SELECT 1 FROM access_control_servers
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
                SELECT 1 FROM access_control_servers
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
                SELECT 1 FROM access_control_servers
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

pub async fn create_server<'e, E>(
    executor: E,
    server: &NewServer,
) -> Result<AccessControlServer, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO access_control_servers
                (name, host_address, username, password, access_token, api_token, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
        "#,
    )
    .bind(&server.name)
    .bind(&server.host_address)
    .bind(&server.username)
    .bind(&server.password)
    .bind(&server.access_token)
    .bind(&server.api_token)
    .bind(&server.status)
    .fetch_one(executor)
    .await
}

pub async fn update_server<'e, E>(
    executor: E,
    id: Uuid,
    server: &NewServer,
) -> Result<AccessControlServer, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE access_control_servers
            SET name = $1, host_address = $2, username = $3, password = $4,
                access_token = $5, api_token = $6, status = $7, updated_at = NOW()
            WHERE id = $8
            RETURNING *
        "#,
    )
    .bind(&server.name)
    .bind(&server.host_address)
    .bind(&server.username)
    .bind(&server.password)
    .bind(&server.access_token)
    .bind(&server.api_token)
    .bind(&server.status)
    .bind(id)
    .fetch_one(executor)
    .await
}

pub async fn soft_delete_server<'e, E>(executor: E, id: Uuid) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            UPDATE access_control_servers
            SET deleted_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}
