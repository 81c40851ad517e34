use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{Attendance, AttendanceSchedule, NewAttendanceSchedule};

pub async fn list_attendances<'e, E>(
    executor: E,
    name_filter: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Attendance>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT *
            FROM attendances
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

pub async fn count_attendances<'e, E>(
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
            FROM attendances
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
) -> Result<Option<Attendance>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT *
            FROM attendances
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
                SELECT 1 FROM attendances
                WHERE id = $1 AND deleted_at IS NULL
            )
        "#,
    )
    .bind(id)
    .fetch_one(executor)
    .await
}

/// Duplicate check among live attendance definitions, excluding `exclude`
/// when `Some`.
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
                SELECT 1 FROM attendances
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

pub async fn create_attendance<'e, E>(executor: E, name: &str) -> Result<Attendance, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO attendances (name)
            VALUES ($1)
            RETURNING *
        "#,
    )
    .bind(name)
    .fetch_one(executor)
    .await
}

pub async fn update_attendance<'e, E>(
    executor: E,
    id: Uuid,
    name: &str,
) -> Result<Attendance, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE attendances
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

pub async fn hard_delete_attendance<'e, E>(executor: E, id: Uuid) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM attendances WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

// --- Schedule rows ---

pub async fn get_schedules_by_attendance<'e, E>(
    executor: E,
    attendance_id: Uuid,
) -> Result<Vec<AttendanceSchedule>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, attendance_id, day_of_week, date, start_time, end_time,
                   early_in_minutes, late_in_minutes, early_out_minutes, late_out_minutes
            FROM attendance_schedules
            WHERE attendance_id = $1
            ORDER BY day_of_week, date
        "#,
    )
    .bind(attendance_id)
    .fetch_all(executor)
    .await
}

pub async fn delete_attendance_schedules<'e, E>(
    executor: E,
    attendance_id: Uuid,
) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM attendance_schedules WHERE attendance_id = $1
        "#,
    )
    .bind(attendance_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

pub async fn insert_attendance_schedules<'e, E>(
    executor: E,
    attendance_id: Uuid,
    schedules: &[NewAttendanceSchedule],
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
    let early_in: Vec<i32> = schedules.iter().map(|s| s.early_in_minutes).collect();
    let late_in: Vec<i32> = schedules.iter().map(|s| s.late_in_minutes).collect();
    let early_out: Vec<i32> = schedules.iter().map(|s| s.early_out_minutes).collect();
    let late_out: Vec<i32> = schedules.iter().map(|s| s.late_out_minutes).collect();

    sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO attendance_schedules
                (attendance_id, day_of_week, date, start_time, end_time,
                 early_in_minutes, late_in_minutes, early_out_minutes, late_out_minutes)
            SELECT $1, t.day, t.date, t.start_time, t.end_time,
                   t.early_in, t.late_in, t.early_out, t.late_out
            FROM UNNEST($2::int4[], $3::date[], $4::time[], $5::time[],
                        $6::int4[], $7::int4[], $8::int4[], $9::int4[])
                AS t(day, date, start_time, end_time, early_in, late_in, early_out, late_out)
        "#,
    )
    .bind(attendance_id)
    .bind(&days)
    .bind(&dates)
    .bind(&starts)
    .bind(&ends)
    .bind(&early_in)
    .bind(&late_in)
    .bind(&early_out)
    .bind(&late_out)
    .execute(executor)
    .await?;
    Ok(())
}
