use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use acm_db::models::{NewPerson, NewPersonCard, Person};
use acm_db::repositories::person::PersonFilter;
use acm_db::repositories::{
    attendance as attendance_repo, person as person_repo, rule as rule_repo,
};

use crate::error::ApiError;
use crate::pagination::{PageQuery, Paginated};
use crate::storage::FileStore;
use crate::validation::{require_name, validate_email, validate_person_type};

use super::model::{
    AttendanceInfo, FaceImageRequest, PersonCardRequest, PersonCardView, PersonFilterQuery,
    PersonRequest, PersonResponse, RuleInfo,
};

const FACE_IMAGE_FOLDER: &str = "faces";

/// Validate scalar fields and assemble the fully-resolved row values for a
/// create or full update. `face_image_path` is decided by the caller because
/// file saves happen outside the database transaction.
fn build_new_person(
    req: &PersonRequest,
    face_image_path: Option<String>,
) -> Result<NewPerson, ApiError> {
    let first_name = require_name(req.first_name.as_deref(), "first name")?;
    let last_name = require_name(req.last_name.as_deref(), "last name")?;
    let person_type = require_name(req.person_type.as_deref(), "person type")?.to_lowercase();
    validate_person_type(&person_type)?;

    if let Some(email) = req.email.as_deref() {
        validate_email(email)?;
    }
    if let (Some(active), Some(expire)) = (req.active_at, req.expire_at) {
        if expire < active {
            return Err(ApiError::Validation(
                "expire date must be after active date".to_string(),
            ));
        }
    }

    Ok(NewPerson {
        first_name,
        middle_name: req.middle_name.clone(),
        last_name,
        person_type,
        person_code: req
            .person_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string),
        gender: req.gender.clone(),
        date_of_birth: req.date_of_birth,
        company: req.company.clone(),
        department: req.department.clone(),
        job_position: req.job_position.clone(),
        address: req.address.clone(),
        mobile_number: req.mobile_number.clone(),
        email: req.email.clone(),
        face_image_path,
        is_verified: req.is_verified.unwrap_or(false),
        active_at: req.active_at,
        expire_at: req.expire_at,
        rule_id: req.rule_id,
        attendance_id: req.attendance_id,
    })
}

fn validate_cards(cards: &[PersonCardRequest]) -> Result<(), ApiError> {
    for card in cards {
        if card.card_number.trim().is_empty() {
            return Err(ApiError::Validation(
                "card number cannot be empty".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_plates(plates: &[String]) -> Result<(), ApiError> {
    for plate in plates {
        if plate.trim().is_empty() {
            return Err(ApiError::Validation(
                "license plate text cannot be empty".to_string(),
            ));
        }
    }
    Ok(())
}

/// Check the assigned rule/attendance references resolve to live rows.
async fn validate_references(pool: &PgPool, req: &PersonRequest) -> Result<(), ApiError> {
    if let Some(rule_id) = req.rule_id {
        if !rule_repo::exists_live(pool, rule_id).await? {
            return Err(ApiError::NotFound(format!(
                "rule with ID '{rule_id}' not found"
            )));
        }
    }
    if let Some(attendance_id) = req.attendance_id {
        if !attendance_repo::exists_live(pool, attendance_id).await? {
            return Err(ApiError::NotFound(format!(
                "attendance with ID '{attendance_id}' not found"
            )));
        }
    }
    Ok(())
}

/// Replace the person's cards inside the caller's transaction. A card number
/// held by a different person is a duplicate; this person's own rows don't
/// conflict because they are deleted before the insert.
async fn replace_cards(
    tx: &mut Transaction<'_, Postgres>,
    person_id: Uuid,
    cards: &[PersonCardRequest],
) -> Result<(), ApiError> {
    for card in cards {
        if person_repo::card_taken(&mut **tx, &card.card_number, Some(person_id)).await? {
            return Err(ApiError::Duplicate {
                field: "card number",
                value: card.card_number.clone(),
            });
        }
    }
    person_repo::delete_person_cards(&mut **tx, person_id).await?;
    let rows: Vec<NewPersonCard> = cards
        .iter()
        .map(|c| NewPersonCard {
            card_number: c.card_number.trim().to_string(),
            active_at: c.active_at,
            expire_at: c.expire_at,
        })
        .collect();
    person_repo::insert_person_cards(&mut **tx, person_id, &rows).await?;
    Ok(())
}

/// Replace the person's license plates inside the caller's transaction.
async fn replace_plates(
    tx: &mut Transaction<'_, Postgres>,
    person_id: Uuid,
    plates: &[String],
) -> Result<(), ApiError> {
    for plate in plates {
        if person_repo::plate_taken(&mut **tx, plate, Some(person_id)).await? {
            return Err(ApiError::Duplicate {
                field: "license plate",
                value: plate.clone(),
            });
        }
    }
    person_repo::delete_person_plates(&mut **tx, person_id).await?;
    let texts: Vec<String> = plates.iter().map(|p| p.trim().to_string()).collect();
    person_repo::insert_person_plates(&mut **tx, person_id, &texts).await?;
    Ok(())
}

/// Decode and persist the face image, returning its store-relative path.
/// Runs before the database transaction; the caller removes the file again
/// if the surrounding write fails.
fn save_face_image(
    store: &FileStore,
    image: Option<&FaceImageRequest>,
) -> Result<Option<String>, ApiError> {
    let Some(image) = image else {
        return Ok(None);
    };
    let bytes = BASE64
        .decode(&image.data)
        .map_err(|_| ApiError::Validation("face image is not valid base64".to_string()))?;
    let extension = image
        .file_name
        .rsplit('.')
        .next()
        .filter(|ext| !ext.is_empty() && ext.len() <= 8)
        .unwrap_or("jpg");
    let path = store.save(FACE_IMAGE_FOLDER, extension, &bytes)?;
    Ok(Some(path))
}

fn cleanup_file(store: &FileStore, path: &str) {
    if let Err(err) = store.delete(path) {
        tracing::warn!(path, "failed to remove orphaned face image: {err}");
    }
}

pub async fn create_person(
    pool: &PgPool,
    store: &FileStore,
    req: PersonRequest,
) -> Result<PersonResponse, ApiError> {
    let cards = req.cards.clone().unwrap_or_default();
    let plates = req.license_plates.clone().unwrap_or_default();
    validate_cards(&cards)?;
    validate_plates(&plates)?;

    let new_person = build_new_person(&req, None)?;
    validate_references(pool, &req).await?;

    if let Some(code) = new_person.person_code.as_deref() {
        if person_repo::person_code_exists(pool, code, None).await? {
            return Err(ApiError::Duplicate {
                field: "person code",
                value: code.to_string(),
            });
        }
    }

    // The image save is not transactional; undo it by hand if the database
    // write fails.
    let image_path = save_face_image(store, req.face_image.as_ref())?;
    let new_person = NewPerson {
        face_image_path: image_path.clone(),
        ..new_person
    };

    let write = async {
        let mut tx = pool.begin().await?;
        let person = person_repo::create_person(&mut *tx, &new_person).await?;
        replace_cards(&mut tx, person.id, &cards).await?;
        replace_plates(&mut tx, person.id, &plates).await?;
        tx.commit().await?;
        Ok::<Person, ApiError>(person)
    };

    match write.await {
        Ok(person) => assemble(pool, &person).await,
        Err(err) => {
            if let Some(path) = &image_path {
                cleanup_file(store, path);
            }
            Err(err)
        }
    }
}

/// Full replacement: every scalar field and both child collections end up as
/// specified in the request.
pub async fn update_person(
    pool: &PgPool,
    store: &FileStore,
    id: Uuid,
    req: PersonRequest,
) -> Result<PersonResponse, ApiError> {
    let existing = person_repo::find_live_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("person with ID '{id}' not found")))?;

    let cards = req.cards.clone().unwrap_or_default();
    let plates = req.license_plates.clone().unwrap_or_default();
    validate_cards(&cards)?;
    validate_plates(&plates)?;

    let new_person = build_new_person(&req, existing.face_image_path.clone())?;
    validate_references(pool, &req).await?;

    if let Some(code) = new_person.person_code.as_deref() {
        if person_repo::person_code_exists(pool, code, Some(existing.id)).await? {
            return Err(ApiError::Duplicate {
                field: "person code",
                value: code.to_string(),
            });
        }
    }

    let new_image_path = save_face_image(store, req.face_image.as_ref())?;
    let replaced_image = new_image_path.is_some();
    let new_person = NewPerson {
        face_image_path: new_image_path
            .clone()
            .or_else(|| existing.face_image_path.clone()),
        ..new_person
    };

    let write = async {
        let mut tx = pool.begin().await?;
        let person = person_repo::update_person(&mut *tx, existing.id, &new_person).await?;
        replace_cards(&mut tx, person.id, &cards).await?;
        replace_plates(&mut tx, person.id, &plates).await?;
        tx.commit().await?;
        Ok::<Person, ApiError>(person)
    };

    match write.await {
        Ok(person) => {
            // The old image is unreferenced once the new path is committed.
            if replaced_image {
                if let Some(old) = &existing.face_image_path {
                    cleanup_file(store, old);
                }
            }
            assemble(pool, &person).await
        }
        Err(err) => {
            if let Some(path) = &new_image_path {
                cleanup_file(store, path);
            }
            Err(err)
        }
    }
}

/// Merge semantics: scalars update only when present; card and plate sets are
/// replaced only when their field was carried in the request.
pub async fn partial_update_person(
    pool: &PgPool,
    store: &FileStore,
    id: Uuid,
    req: PersonRequest,
) -> Result<PersonResponse, ApiError> {
    let existing = person_repo::find_live_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("person with ID '{id}' not found")))?;

    if let Some(cards) = &req.cards {
        validate_cards(cards)?;
    }
    if let Some(plates) = &req.license_plates {
        validate_plates(plates)?;
    }
    if let Some(person_type) = req.person_type.as_deref() {
        validate_person_type(person_type)?;
    }
    if let Some(email) = req.email.as_deref() {
        validate_email(email)?;
    }
    validate_references(pool, &req).await?;

    let person_code = match req.person_code.as_deref().map(str::trim) {
        Some(code) if !code.is_empty() => Some(code.to_string()),
        Some(_) => None,
        None => existing.person_code.clone(),
    };
    if let Some(code) = person_code.as_deref() {
        if person_repo::person_code_exists(pool, code, Some(existing.id)).await? {
            return Err(ApiError::Duplicate {
                field: "person code",
                value: code.to_string(),
            });
        }
    }

    let new_image_path = save_face_image(store, req.face_image.as_ref())?;
    let replaced_image = new_image_path.is_some();

    let merged = NewPerson {
        first_name: req
            .first_name
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| existing.first_name.clone()),
        middle_name: req.middle_name.clone().or_else(|| existing.middle_name.clone()),
        last_name: req
            .last_name
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| existing.last_name.clone()),
        person_type: req
            .person_type
            .clone()
            .map(|t| t.to_lowercase())
            .unwrap_or(existing.person_type.clone()),
        person_code,
        gender: req.gender.clone().or_else(|| existing.gender.clone()),
        date_of_birth: req.date_of_birth.or(existing.date_of_birth),
        company: req.company.clone().or_else(|| existing.company.clone()),
        department: req.department.clone().or_else(|| existing.department.clone()),
        job_position: req
            .job_position
            .clone()
            .or_else(|| existing.job_position.clone()),
        address: req.address.clone().or_else(|| existing.address.clone()),
        mobile_number: req
            .mobile_number
            .clone()
            .or_else(|| existing.mobile_number.clone()),
        email: req.email.clone().or_else(|| existing.email.clone()),
        face_image_path: new_image_path
            .clone()
            .or_else(|| existing.face_image_path.clone()),
        is_verified: req.is_verified.unwrap_or(existing.is_verified),
        active_at: req.active_at.or(existing.active_at),
        expire_at: req.expire_at.or(existing.expire_at),
        rule_id: req.rule_id.or(existing.rule_id),
        attendance_id: req.attendance_id.or(existing.attendance_id),
    };

    let write = async {
        let mut tx = pool.begin().await?;
        let person = person_repo::update_person(&mut *tx, existing.id, &merged).await?;
        if let Some(cards) = &req.cards {
            replace_cards(&mut tx, person.id, cards).await?;
        }
        if let Some(plates) = &req.license_plates {
            replace_plates(&mut tx, person.id, plates).await?;
        }
        tx.commit().await?;
        Ok::<Person, ApiError>(person)
    };

    match write.await {
        Ok(person) => {
            if replaced_image {
                if let Some(old) = &existing.face_image_path {
                    cleanup_file(store, old);
                }
            }
            assemble(pool, &person).await
        }
        Err(err) => {
            if let Some(path) = &new_image_path {
                cleanup_file(store, path);
            }
            Err(err)
        }
    }
}

/// Cascade delete: cards and plates are hard-deleted, the person row keeps
/// only a soft-delete marker.
pub async fn delete_person(pool: &PgPool, id: Uuid) -> Result<(), ApiError> {
    let existing = person_repo::find_live_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("person with ID '{id}' not found")))?;

    let mut tx = pool.begin().await?;
    person_repo::delete_person_cards(&mut *tx, existing.id).await?;
    person_repo::delete_person_plates(&mut *tx, existing.id).await?;
    person_repo::soft_delete_person(&mut *tx, existing.id).await?;
    tx.commit().await?;

    Ok(())
}

pub async fn get_person(pool: &PgPool, id: Uuid) -> Result<PersonResponse, ApiError> {
    let person = person_repo::find_live_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("person with ID '{id}' not found")))?;
    assemble(pool, &person).await
}

pub async fn list_people(
    pool: &PgPool,
    filter: &PersonFilterQuery,
    page: &PageQuery,
) -> Result<Paginated<PersonResponse>, ApiError> {
    page.validate()?;

    let db_filter = PersonFilter {
        first_name: filter.first_name.clone(),
        last_name: filter.last_name.clone(),
        company: filter.company.clone(),
        department: filter.department.clone(),
        email: filter.email.clone(),
    };
    let people = person_repo::list_people(pool, &db_filter, page.limit, page.offset()).await?;
    let total = person_repo::count_people(pool, &db_filter).await?;

    let mut items = Vec::with_capacity(people.len());
    for person in &people {
        items.push(assemble(pool, person).await?);
    }

    Ok(Paginated::new(items, page, total))
}

/// Build the read view. Assigned rule/attendance references that no longer
/// resolve are dropped from the view rather than failing it.
pub(crate) async fn assemble(pool: &PgPool, person: &Person) -> Result<PersonResponse, ApiError> {
    let cards = person_repo::get_cards_by_person(pool, person.id)
        .await?
        .into_iter()
        .map(|c| PersonCardView {
            card_number: c.card_number,
            active_at: c.active_at,
            expire_at: c.expire_at,
        })
        .collect();

    let license_plates = person_repo::get_plates_by_person(pool, person.id)
        .await?
        .into_iter()
        .map(|p| p.plate_text)
        .collect();

    let rule = match person.rule_id {
        Some(rule_id) => match rule_repo::find_live_by_id(pool, rule_id).await? {
            Some(r) => Some(RuleInfo {
                id: r.id,
                name: r.name,
            }),
            None => {
                tracing::debug!(person_id = %person.id, %rule_id, "skipping dangling rule reference");
                None
            }
        },
        None => None,
    };

    let attendance = match person.attendance_id {
        Some(attendance_id) => {
            match attendance_repo::find_live_by_id(pool, attendance_id).await? {
                Some(a) => Some(AttendanceInfo {
                    id: a.id,
                    name: a.name,
                }),
                None => {
                    tracing::debug!(person_id = %person.id, %attendance_id, "skipping dangling attendance reference");
                    None
                }
            }
        }
        None => None,
    };

    Ok(PersonResponse {
        id: person.id,
        first_name: person.first_name.clone(),
        middle_name: person.middle_name.clone(),
        last_name: person.last_name.clone(),
        person_type: person.person_type.clone(),
        person_code: person.person_code.clone(),
        gender: person.gender.clone(),
        date_of_birth: person.date_of_birth,
        company: person.company.clone(),
        department: person.department.clone(),
        job_position: person.job_position.clone(),
        address: person.address.clone(),
        mobile_number: person.mobile_number.clone(),
        email: person.email.clone(),
        face_image_path: person.face_image_path.clone(),
        is_verified: person.is_verified,
        active_at: person.active_at,
        expire_at: person.expire_at,
        cards,
        license_plates,
        rule,
        attendance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_request() -> PersonRequest {
        PersonRequest {
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            person_type: Some("employee".to_string()),
            ..PersonRequest::default()
        }
    }

    #[test]
    fn test_build_new_person_requires_names_and_type() {
        assert!(build_new_person(&minimal_request(), None).is_ok());

        let mut missing_first = minimal_request();
        missing_first.first_name = None;
        assert!(build_new_person(&missing_first, None).is_err());

        let mut bad_type = minimal_request();
        bad_type.person_type = Some("robot".to_string());
        assert!(build_new_person(&bad_type, None).is_err());
    }

    #[test]
    fn test_build_new_person_rejects_expire_before_active() {
        let mut req = minimal_request();
        req.active_at = chrono::NaiveDate::from_ymd_opt(2025, 6, 1);
        req.expire_at = chrono::NaiveDate::from_ymd_opt(2025, 1, 1);
        assert!(build_new_person(&req, None).is_err());
    }

    #[test]
    fn test_build_new_person_blank_person_code_becomes_none() {
        let mut req = minimal_request();
        req.person_code = Some("   ".to_string());
        let person = build_new_person(&req, None).unwrap();
        assert_eq!(person.person_code, None);
    }

    #[test]
    fn test_validate_cards_rejects_blank_numbers() {
        let cards = vec![PersonCardRequest {
            card_number: "  ".to_string(),
            active_at: None,
            expire_at: None,
        }];
        assert!(validate_cards(&cards).is_err());
    }
}
