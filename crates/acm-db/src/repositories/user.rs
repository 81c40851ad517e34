use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{NewUserPermission, User, UserPermission};

pub async fn list_users<'e, E>(
    executor: E,
    username_filter: Option<&str>,
    status_filter: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<User>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT *
            FROM users
            WHERE deleted_at IS NULL
                AND ($1::text IS NULL OR username ILIKE '%' || $1 || '%')
                AND ($2::text IS NULL OR status = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
        "#,
    )
    .bind(username_filter)
    .bind(status_filter)
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await
}

pub async fn count_users<'e, E>(
    executor: E,
    username_filter: Option<&str>,
    status_filter: Option<&str>,
) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT COUNT(*)
            FROM users
            WHERE deleted_at IS NULL
                AND ($1::text IS NULL OR username ILIKE '%' || $1 || '%')
                AND ($2::text IS NULL OR status = $2)
        "#,
    )
    .bind(username_filter)
    .bind(status_filter)
    .fetch_one(executor)
    .await
}

pub async fn find_live_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<User>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT *
            FROM users
            WHERE id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn find_live_by_username<'e, E>(
    executor: E,
    username: &str,
) -> Result<Option<User>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT *
            FROM users
            WHERE username = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(username)
    .fetch_optional(executor)
    .await
}

/// Duplicate check among live users, excluding `exclude` when `Some`.
pub async fn username_exists<'e, E>(
    executor: E,
    username: &str,
    exclude: Option<Uuid>,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT EXISTS (
                SELECT 1 FROM users
                WHERE username = $1
                    AND deleted_at IS NULL
                    AND ($2::uuid IS NULL OR id <> $2)
            )
        "#,
    )
    .bind(username)
    .bind(exclude)
    .fetch_one(executor)
    .await
}

pub async fn create_user<'e, E>(
    executor: E,
    username: &str,
    password_hash: &str,
    status: &str,
) -> Result<User, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO users (username, password_hash, status)
            VALUES ($1, $2, $3)
            RETURNING *
        "#,
    )
    .bind(username)
    .bind(password_hash)
    .bind(status)
    .fetch_one(executor)
    .await
}

pub async fn update_user<'e, E>(
    executor: E,
    id: Uuid,
    username: &str,
    password_hash: &str,
    status: &str,
) -> Result<User, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE users
            SET username = $1, password_hash = $2, status = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING *
        "#,
    )
    .bind(username)
    .bind(password_hash)
    .bind(status)
    .bind(id)
    .fetch_one(executor)
    .await
}

pub async fn hard_delete_user<'e, E>(executor: E, id: Uuid) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM users WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

// --- Permission row (1:1, replaced wholesale) ---

pub async fn get_permission_by_user<'e, E>(
    executor: E,
    user_id: Uuid,
) -> Result<Option<UserPermission>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, user_id, people_permission, device_permission, rule_permission,
                   time_attendance_permission, report_permission, notification_permission,
                   system_log_permission
            FROM user_permissions
            WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

pub async fn delete_permission_by_user<'e, E>(
    executor: E,
    user_id: Uuid,
) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM user_permissions WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

pub async fn insert_permission<'e, E>(
    executor: E,
    user_id: Uuid,
    permission: &NewUserPermission,
) -> Result<UserPermission, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO user_permissions
                (user_id, people_permission, device_permission, rule_permission,
                 time_attendance_permission, report_permission, notification_permission,
                 system_log_permission)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, user_id, people_permission, device_permission, rule_permission,
                      time_attendance_permission, report_permission, notification_permission,
                      system_log_permission
        "#,
    )
    .bind(user_id)
    .bind(permission.people_permission)
    .bind(permission.device_permission)
    .bind(permission.rule_permission)
    .bind(permission.time_attendance_permission)
    .bind(permission.report_permission)
    .bind(permission.notification_permission)
    .bind(permission.system_log_permission)
    .fetch_one(executor)
    .await
}
