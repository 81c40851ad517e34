use chrono::NaiveTime;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use acm_db::models::{Attendance, NewAttendanceSchedule};
use acm_db::repositories::attendance as attendance_repo;

use crate::error::ApiError;
use crate::pagination::{PageQuery, Paginated};
use crate::validation::{require_name, validate_day_of_week};

use super::model::{
    AttendanceFilterQuery, AttendanceRequest, AttendanceResponse, AttendanceScheduleRequest,
    AttendanceScheduleView,
};

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).expect("valid constant time")
}

/// Default policy: one window per weekday covering the whole day with zero
/// grace in every direction.
pub(crate) fn default_schedules() -> Vec<AttendanceScheduleRequest> {
    (1..=7)
        .map(|day| AttendanceScheduleRequest {
            day_of_week: day,
            date: None,
            start_time: NaiveTime::MIN,
            end_time: end_of_day(),
            early_in_minutes: Some(0),
            late_in_minutes: Some(0),
            early_out_minutes: Some(0),
            late_out_minutes: Some(0),
        })
        .collect()
}

/// Fill in the seven-day default when the schedule collection was omitted
/// entirely. An explicit empty list stays empty.
pub(crate) fn expand_defaults(req: &mut AttendanceRequest) {
    if req.schedules.is_none() {
        req.schedules = Some(default_schedules());
    }
}

fn validate_schedules(schedules: &[AttendanceScheduleRequest]) -> Result<(), ApiError> {
    for schedule in schedules {
        validate_day_of_week(schedule.day_of_week)?;
        for grace in [
            schedule.early_in_minutes,
            schedule.late_in_minutes,
            schedule.early_out_minutes,
            schedule.late_out_minutes,
        ]
        .into_iter()
        .flatten()
        {
            if grace < 0 {
                return Err(ApiError::Validation(
                    "grace minutes cannot be negative".to_string(),
                ));
            }
        }
    }
    Ok(())
}

pub(crate) fn to_new_schedules(
    schedules: &[AttendanceScheduleRequest],
) -> Vec<NewAttendanceSchedule> {
    schedules
        .iter()
        .map(|s| NewAttendanceSchedule {
            day_of_week: s.day_of_week,
            date: s.date,
            start_time: s.start_time,
            end_time: s.end_time,
            early_in_minutes: s.early_in_minutes.unwrap_or(0),
            late_in_minutes: s.late_in_minutes.unwrap_or(0),
            early_out_minutes: s.early_out_minutes.unwrap_or(0),
            late_out_minutes: s.late_out_minutes.unwrap_or(0),
        })
        .collect()
}

/// Replace the attendance definition's schedule rows inside the caller's
/// transaction.
async fn replace_schedules(
    tx: &mut Transaction<'_, Postgres>,
    attendance_id: Uuid,
    schedules: &[AttendanceScheduleRequest],
) -> Result<(), ApiError> {
    attendance_repo::delete_attendance_schedules(&mut **tx, attendance_id).await?;
    attendance_repo::insert_attendance_schedules(
        &mut **tx,
        attendance_id,
        &to_new_schedules(schedules),
    )
    .await?;
    Ok(())
}

pub async fn create_attendance(
    pool: &PgPool,
    mut req: AttendanceRequest,
) -> Result<AttendanceResponse, ApiError> {
    let name = require_name(req.name.as_deref(), "attendance name")?;
    expand_defaults(&mut req);
    let schedules = req.schedules.unwrap_or_default();
    validate_schedules(&schedules)?;

    if attendance_repo::name_exists(pool, &name, None).await? {
        return Err(ApiError::Duplicate {
            field: "name",
            value: name,
        });
    }

    let mut tx = pool.begin().await?;
    let attendance = attendance_repo::create_attendance(&mut *tx, &name).await?;
    replace_schedules(&mut tx, attendance.id, &schedules).await?;
    tx.commit().await?;

    assemble(pool, &attendance).await
}

/// Full replacement of the definition's name and schedule set.
pub async fn update_attendance(
    pool: &PgPool,
    id: Uuid,
    mut req: AttendanceRequest,
) -> Result<AttendanceResponse, ApiError> {
    let existing = attendance_repo::find_live_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("attendance with ID '{id}' not found")))?;

    let name = require_name(req.name.as_deref(), "attendance name")?;
    expand_defaults(&mut req);
    let schedules = req.schedules.unwrap_or_default();
    validate_schedules(&schedules)?;

    if attendance_repo::name_exists(pool, &name, Some(existing.id)).await? {
        return Err(ApiError::Duplicate {
            field: "name",
            value: name,
        });
    }

    let mut tx = pool.begin().await?;
    let attendance = attendance_repo::update_attendance(&mut *tx, existing.id, &name).await?;
    replace_schedules(&mut tx, attendance.id, &schedules).await?;
    tx.commit().await?;

    assemble(pool, &attendance).await
}

/// Merge semantics: schedules are replaced only when present in the request.
pub async fn partial_update_attendance(
    pool: &PgPool,
    id: Uuid,
    req: AttendanceRequest,
) -> Result<AttendanceResponse, ApiError> {
    let existing = attendance_repo::find_live_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("attendance with ID '{id}' not found")))?;

    let name = match req.name.as_deref() {
        Some(_) => require_name(req.name.as_deref(), "attendance name")?,
        None => existing.name.clone(),
    };

    if let Some(schedules) = &req.schedules {
        validate_schedules(schedules)?;
    }

    if attendance_repo::name_exists(pool, &name, Some(existing.id)).await? {
        return Err(ApiError::Duplicate {
            field: "name",
            value: name,
        });
    }

    let mut tx = pool.begin().await?;
    let attendance = attendance_repo::update_attendance(&mut *tx, existing.id, &name).await?;
    if let Some(schedules) = &req.schedules {
        replace_schedules(&mut tx, attendance.id, schedules).await?;
    }
    tx.commit().await?;

    assemble(pool, &attendance).await
}

/// Cascade delete: schedule rows first, then the attendance row, one
/// transaction.
pub async fn delete_attendance(pool: &PgPool, id: Uuid) -> Result<(), ApiError> {
    let existing = attendance_repo::find_live_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("attendance with ID '{id}' not found")))?;

    let mut tx = pool.begin().await?;
    attendance_repo::delete_attendance_schedules(&mut *tx, existing.id).await?;
    attendance_repo::hard_delete_attendance(&mut *tx, existing.id).await?;
    tx.commit().await?;

    Ok(())
}

pub async fn get_attendance(pool: &PgPool, id: Uuid) -> Result<AttendanceResponse, ApiError> {
    let attendance = attendance_repo::find_live_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("attendance with ID '{id}' not found")))?;
    assemble(pool, &attendance).await
}

pub async fn list_attendances(
    pool: &PgPool,
    filter: &AttendanceFilterQuery,
    page: &PageQuery,
) -> Result<Paginated<AttendanceResponse>, ApiError> {
    page.validate()?;

    let attendances =
        attendance_repo::list_attendances(pool, filter.name.as_deref(), page.limit, page.offset())
            .await?;
    let total = attendance_repo::count_attendances(pool, filter.name.as_deref()).await?;

    let mut items = Vec::with_capacity(attendances.len());
    for attendance in &attendances {
        items.push(assemble(pool, attendance).await?);
    }

    Ok(Paginated::new(items, page, total))
}

pub(crate) async fn assemble(
    pool: &PgPool,
    attendance: &Attendance,
) -> Result<AttendanceResponse, ApiError> {
    let schedules = attendance_repo::get_schedules_by_attendance(pool, attendance.id)
        .await?
        .into_iter()
        .map(|s| AttendanceScheduleView {
            id: s.id,
            day_of_week: s.day_of_week,
            date: s.date,
            start_time: s.start_time,
            end_time: s.end_time,
            early_in_minutes: s.early_in_minutes,
            late_in_minutes: s.late_in_minutes,
            early_out_minutes: s.early_out_minutes,
            late_out_minutes: s.late_out_minutes,
        })
        .collect();

    Ok(AttendanceResponse {
        id: attendance.id,
        name: attendance.name.clone(),
        schedules,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedules_full_day_zero_grace() {
        let schedules = default_schedules();
        assert_eq!(schedules.len(), 7);
        for (i, schedule) in schedules.iter().enumerate() {
            assert_eq!(schedule.day_of_week, i as i32 + 1);
            assert_eq!(schedule.start_time, NaiveTime::MIN);
            assert_eq!(
                schedule.end_time,
                NaiveTime::from_hms_opt(23, 59, 59).unwrap()
            );
            assert_eq!(schedule.early_in_minutes, Some(0));
            assert_eq!(schedule.late_in_minutes, Some(0));
            assert_eq!(schedule.early_out_minutes, Some(0));
            assert_eq!(schedule.late_out_minutes, Some(0));
        }
    }

    #[test]
    fn test_expand_defaults_absent_vs_empty() {
        let mut absent = AttendanceRequest {
            name: Some("office hours".to_string()),
            schedules: None,
        };
        expand_defaults(&mut absent);
        assert_eq!(absent.schedules.as_ref().map(Vec::len), Some(7));

        let mut empty = AttendanceRequest {
            name: Some("office hours".to_string()),
            schedules: Some(Vec::new()),
        };
        expand_defaults(&mut empty);
        assert_eq!(empty.schedules.as_ref().map(Vec::len), Some(0));
    }

    #[test]
    fn test_omitted_grace_minutes_default_to_zero() {
        let schedules = vec![AttendanceScheduleRequest {
            day_of_week: 3,
            date: None,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(17, 30, 0).unwrap(),
            early_in_minutes: None,
            late_in_minutes: Some(15),
            early_out_minutes: None,
            late_out_minutes: None,
        }];
        let rows = to_new_schedules(&schedules);
        assert_eq!(rows[0].early_in_minutes, 0);
        assert_eq!(rows[0].late_in_minutes, 15);
        assert_eq!(rows[0].early_out_minutes, 0);
        assert_eq!(rows[0].late_out_minutes, 0);
    }

    #[test]
    fn test_validate_schedules() {
        let mut schedules = default_schedules();
        assert!(validate_schedules(&schedules).is_ok());

        schedules[0].day_of_week = 0;
        assert!(validate_schedules(&schedules).is_err());

        let mut negative = default_schedules();
        negative[2].late_out_minutes = Some(-5);
        assert!(validate_schedules(&negative).is_err());
    }
}
