use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::{NewPerson, NewPersonCard, Person, PersonCard, PersonLicensePlate};

/// Search filters applied to the people listing; every field is optional.
#[derive(Debug, Clone, Default)]
pub struct PersonFilter {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub company: Option<String>,
    pub department: Option<String>,
    pub email: Option<String>,
}

pub async fn list_people<'e, E>(
    executor: E,
    filter: &PersonFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<Person>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT *
            FROM people
            WHERE deleted_at IS NULL
                AND ($1::text IS NULL OR first_name ILIKE '%' || $1 || '%')
                AND ($2::text IS NULL OR last_name ILIKE '%' || $2 || '%')
                AND ($3::text IS NULL OR company ILIKE '%' || $3 || '%')
                AND ($4::text IS NULL OR department ILIKE '%' || $4 || '%')
                AND ($5::text IS NULL OR email ILIKE '%' || $5 || '%')
            ORDER BY created_at DESC
            LIMIT $6 OFFSET $7
        "#,
    )
    .bind(&filter.first_name)
    .bind(&filter.last_name)
    .bind(&filter.company)
    .bind(&filter.department)
    .bind(&filter.email)
    .bind(limit)
    .bind(offset)
    .fetch_all(executor)
    .await
}

pub async fn count_people<'e, E>(executor: E, filter: &PersonFilter) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT COUNT(*)
            FROM people
            WHERE deleted_at IS NULL
                AND ($1::text IS NULL OR first_name ILIKE '%' || $1 || '%')
                AND ($2::text IS NULL OR last_name ILIKE '%' || $2 || '%')
                AND ($3::text IS NULL OR company ILIKE '%' || $3 || '%')
                AND ($4::text IS NULL OR department ILIKE '%' || $4 || '%')
                AND ($5::text IS NULL OR email ILIKE '%' || $5 || '%')
        "#,
    )
    .bind(&filter.first_name)
    .bind(&filter.last_name)
    .bind(&filter.company)
    .bind(&filter.department)
    .bind(&filter.email)
    .fetch_one(executor)
    .await
}

pub async fn find_live_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<Person>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT *
            FROM people
            WHERE id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Duplicate check on the external person code among live people, excluding
/// `exclude` when `Some`.
pub async fn person_code_exists<'e, E>(
    executor: E,
    person_code: &str,
    exclude: Option<Uuid>,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT EXISTS (
                SELECT 1 FROM people
                WHERE person_code = $1
                    AND deleted_at IS NULL
                    AND ($2::uuid IS NULL OR id <> $2)
            )
        "#,
    )
    .bind(person_code)
    .bind(exclude)
    .fetch_one(executor)
    .await
}

pub async fn create_person<'e, E>(executor: E, person: &NewPerson) -> Result<Person, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            INSERT INTO people
                (first_name, middle_name, last_name, person_type, person_code, gender,
                 date_of_birth, company, department, job_position, address, mobile_number,
                 email, face_image_path, is_verified, active_at, expire_at, rule_id,
                 attendance_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                    $16, $17, $18, $19)
            RETURNING *
        "#,
    )
    .bind(&person.first_name)
    .bind(&person.middle_name)
    .bind(&person.last_name)
    .bind(&person.person_type)
    .bind(&person.person_code)
    .bind(&person.gender)
    .bind(person.date_of_birth)
    .bind(&person.company)
    .bind(&person.department)
    .bind(&person.job_position)
    .bind(&person.address)
    .bind(&person.mobile_number)
    .bind(&person.email)
    .bind(&person.face_image_path)
    .bind(person.is_verified)
    .bind(person.active_at)
    .bind(person.expire_at)
    .bind(person.rule_id)
    .bind(person.attendance_id)
    .fetch_one(executor)
    .await
}

pub async fn update_person<'e, E>(
    executor: E,
    id: Uuid,
    person: &NewPerson,
) -> Result<Person, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            UPDATE people
            SET first_name = $1, middle_name = $2, last_name = $3, person_type = $4,
                person_code = $5, gender = $6, date_of_birth = $7, company = $8,
                department = $9, job_position = $10, address = $11, mobile_number = $12,
                email = $13, face_image_path = $14, is_verified = $15, active_at = $16,
                expire_at = $17, rule_id = $18, attendance_id = $19, updated_at = NOW()
            WHERE id = $20
            RETURNING *
        "#,
    )
    .bind(&person.first_name)
    .bind(&person.middle_name)
    .bind(&person.last_name)
    .bind(&person.person_type)
    .bind(&person.person_code)
    .bind(&person.gender)
    .bind(person.date_of_birth)
    .bind(&person.company)
    .bind(&person.department)
    .bind(&person.job_position)
    .bind(&person.address)
    .bind(&person.mobile_number)
    .bind(&person.email)
    .bind(&person.face_image_path)
    .bind(person.is_verified)
    .bind(person.active_at)
    .bind(person.expire_at)
    .bind(person.rule_id)
    .bind(person.attendance_id)
    .bind(id)
    .fetch_one(executor)
    .await
}

pub async fn soft_delete_person<'e, E>(executor: E, id: Uuid) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            UPDATE people
            SET deleted_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

// --- Card rows ---

pub async fn get_cards_by_person<'e, E>(
    executor: E,
    person_id: Uuid,
) -> Result<Vec<PersonCard>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, person_id, card_number, active_at, expire_at
            FROM person_cards
            WHERE person_id = $1
            ORDER BY card_number
        "#,
    )
    .bind(person_id)
    .fetch_all(executor)
    .await
}

/// True when another person already holds this card number. The owner's own
/// rows don't count; they are deleted before reinsertion inside the same
/// transaction.
pub async fn card_taken<'e, E>(
    executor: E,
    card_number: &str,
    exclude_person: Option<Uuid>,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT EXISTS (
                SELECT 1 FROM person_cards
                WHERE card_number = $1
                    AND ($2::uuid IS NULL OR person_id <> $2)
            )
        "#,
    )
    .bind(card_number)
    .bind(exclude_person)
    .fetch_one(executor)
    .await
}

pub async fn delete_person_cards<'e, E>(executor: E, person_id: Uuid) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM person_cards WHERE person_id = $1
        "#,
    )
    .bind(person_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

pub async fn insert_person_cards<'e, E>(
    executor: E,
    person_id: Uuid,
    cards: &[NewPersonCard],
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    if cards.is_empty() {
        return Ok(());
    }
    let numbers: Vec<&str> = cards.iter().map(|c| c.card_number.as_str()).collect();
    let active: Vec<Option<chrono::NaiveDate>> = cards.iter().map(|c| c.active_at).collect();
    let expire: Vec<Option<chrono::NaiveDate>> = cards.iter().map(|c| c.expire_at).collect();

    sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO person_cards (person_id, card_number, active_at, expire_at)
            SELECT $1, t.card_number, t.active_at, t.expire_at
            FROM UNNEST($2::text[], $3::date[], $4::date[])
                AS t(card_number, active_at, expire_at)
        "#,
    )
    .bind(person_id)
    .bind(&numbers)
    .bind(&active)
    .bind(&expire)
    .execute(executor)
    .await?;
    Ok(())
}

// --- License plate rows ---

pub async fn get_plates_by_person<'e, E>(
    executor: E,
    person_id: Uuid,
) -> Result<Vec<PersonLicensePlate>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT id, person_id, plate_text
            FROM person_license_plates
            WHERE person_id = $1
            ORDER BY plate_text
        "#,
    )
    .bind(person_id)
    .fetch_all(executor)
    .await
}

pub async fn plate_taken<'e, E>(
    executor: E,
    plate_text: &str,
    exclude_person: Option<Uuid>,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT EXISTS (
                SELECT 1 FROM person_license_plates
                WHERE plate_text = $1
                    AND ($2::uuid IS NULL OR person_id <> $2)
            )
        "#,
    )
    .bind(plate_text)
    .bind(exclude_person)
    .fetch_one(executor)
    .await
}

pub async fn delete_person_plates<'e, E>(executor: E, person_id: Uuid) -> Result<u64, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        // language=PostgreSQL
        r#"
            DELETE FROM person_license_plates WHERE person_id = $1
        "#,
    )
    .bind(person_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

pub async fn insert_person_plates<'e, E>(
    executor: E,
    person_id: Uuid,
    plate_texts: &[String],
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    if plate_texts.is_empty() {
        return Ok(());
    }
    sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO person_license_plates (person_id, plate_text)
            SELECT $1, p FROM UNNEST($2::text[]) AS p
        "#,
    )
    .bind(person_id)
    .bind(plate_texts)
    .execute(executor)
    .await?;
    Ok(())
}
