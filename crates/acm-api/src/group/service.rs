use chrono::NaiveTime;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use acm_db::models::{AccessControlGroup, NewGroupSchedule};
use acm_db::repositories::{device as device_repo, group as group_repo};

use crate::error::ApiError;
use crate::pagination::{PageQuery, Paginated};
use crate::validation::{require_name, validate_day_of_week};

use super::model::{
    DeviceInfo, GroupFilterQuery, GroupRequest, GroupResponse, GroupScheduleRequest,
    GroupScheduleView,
};

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).expect("valid constant time")
}

/// Unrestricted default: one window per weekday spanning the whole day.
pub(crate) fn default_schedules() -> Vec<GroupScheduleRequest> {
    (1..=7)
        .map(|day| GroupScheduleRequest {
            day_of_week: day,
            date: None,
            start_time: NaiveTime::MIN,
            end_time: end_of_day(),
        })
        .collect()
}

/// Fill in policy defaults for child collections the request omitted.
/// `Some(vec![])` is an explicit "no children" and is left alone.
pub(crate) fn expand_defaults(req: &mut GroupRequest) {
    if req.device_ids.is_none() {
        req.device_ids = Some(Vec::new());
    }
    if req.schedules.is_none() {
        req.schedules = Some(default_schedules());
    }
}

fn validate_schedules(schedules: &[GroupScheduleRequest]) -> Result<(), ApiError> {
    for schedule in schedules {
        validate_day_of_week(schedule.day_of_week)?;
    }
    Ok(())
}

fn to_new_schedules(schedules: &[GroupScheduleRequest]) -> Vec<NewGroupSchedule> {
    schedules
        .iter()
        .map(|s| NewGroupSchedule {
            day_of_week: s.day_of_week,
            date: s.date,
            start_time: s.start_time,
            end_time: s.end_time,
        })
        .collect()
}

/// Replace the group's device memberships inside the caller's transaction:
/// validate every reference, drop the old set, insert the new one.
async fn replace_devices(
    tx: &mut Transaction<'_, Postgres>,
    group_id: Uuid,
    device_ids: &[Uuid],
) -> Result<(), ApiError> {
    for device_id in device_ids {
        if !device_repo::exists_live(&mut **tx, *device_id).await? {
            return Err(ApiError::NotFound(format!(
                "device with ID '{device_id}' not found"
            )));
        }
    }
    group_repo::delete_group_devices(&mut **tx, group_id).await?;
    group_repo::insert_group_devices(&mut **tx, group_id, device_ids).await?;
    Ok(())
}

/// Replace the group's schedule windows inside the caller's transaction.
async fn replace_schedules(
    tx: &mut Transaction<'_, Postgres>,
    group_id: Uuid,
    schedules: &[GroupScheduleRequest],
) -> Result<(), ApiError> {
    group_repo::delete_group_schedules(&mut **tx, group_id).await?;
    group_repo::insert_group_schedules(&mut **tx, group_id, &to_new_schedules(schedules)).await?;
    Ok(())
}

pub async fn create_group(pool: &PgPool, mut req: GroupRequest) -> Result<GroupResponse, ApiError> {
    let name = require_name(req.name.as_deref(), "group name")?;
    expand_defaults(&mut req);
    let device_ids = req.device_ids.unwrap_or_default();
    let schedules = req.schedules.unwrap_or_default();
    validate_schedules(&schedules)?;

    if group_repo::name_exists(pool, &name, None).await? {
        return Err(ApiError::Duplicate {
            field: "name",
            value: name,
        });
    }

    let mut tx = pool.begin().await?;
    let group = group_repo::create_group(&mut *tx, &name).await?;
    replace_devices(&mut tx, group.id, &device_ids).await?;
    replace_schedules(&mut tx, group.id, &schedules).await?;
    tx.commit().await?;

    assemble(pool, &group).await
}

/// Full replacement: scalar fields and both child collections end up exactly
/// as specified in the request.
pub async fn update_group(
    pool: &PgPool,
    id: Uuid,
    mut req: GroupRequest,
) -> Result<GroupResponse, ApiError> {
    let existing = group_repo::find_live_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("group with ID '{id}' not found")))?;

    let name = require_name(req.name.as_deref(), "group name")?;
    expand_defaults(&mut req);
    let device_ids = req.device_ids.unwrap_or_default();
    let schedules = req.schedules.unwrap_or_default();
    validate_schedules(&schedules)?;

    if group_repo::name_exists(pool, &name, Some(existing.id)).await? {
        return Err(ApiError::Duplicate {
            field: "name",
            value: name,
        });
    }

    let mut tx = pool.begin().await?;
    let group = group_repo::update_group(&mut *tx, existing.id, &name).await?;
    replace_devices(&mut tx, group.id, &device_ids).await?;
    replace_schedules(&mut tx, group.id, &schedules).await?;
    tx.commit().await?;

    assemble(pool, &group).await
}

/// Merge semantics: a child collection is replaced only when the request
/// carried it; an omitted collection keeps its current rows.
pub async fn partial_update_group(
    pool: &PgPool,
    id: Uuid,
    req: GroupRequest,
) -> Result<GroupResponse, ApiError> {
    let existing = group_repo::find_live_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("group with ID '{id}' not found")))?;

    let name = match req.name.as_deref() {
        Some(_) => require_name(req.name.as_deref(), "group name")?,
        None => existing.name.clone(),
    };

    if let Some(schedules) = &req.schedules {
        validate_schedules(schedules)?;
    }

    if group_repo::name_exists(pool, &name, Some(existing.id)).await? {
        return Err(ApiError::Duplicate {
            field: "name",
            value: name,
        });
    }

    let mut tx = pool.begin().await?;
    let group = group_repo::update_group(&mut *tx, existing.id, &name).await?;
    if let Some(device_ids) = &req.device_ids {
        replace_devices(&mut tx, group.id, device_ids).await?;
    }
    if let Some(schedules) = &req.schedules {
        replace_schedules(&mut tx, group.id, schedules).await?;
    }
    tx.commit().await?;

    assemble(pool, &group).await
}

/// Cascade delete: membership and schedule rows go first, then the group row
/// itself, all in one transaction. Irreversible.
pub async fn delete_group(pool: &PgPool, id: Uuid) -> Result<(), ApiError> {
    let existing = group_repo::find_live_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("group with ID '{id}' not found")))?;

    let mut tx = pool.begin().await?;
    group_repo::delete_group_devices(&mut *tx, existing.id).await?;
    group_repo::delete_group_schedules(&mut *tx, existing.id).await?;
    group_repo::hard_delete_group(&mut *tx, existing.id).await?;
    tx.commit().await?;

    Ok(())
}

pub async fn get_group(pool: &PgPool, id: Uuid) -> Result<GroupResponse, ApiError> {
    let group = group_repo::find_live_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("group with ID '{id}' not found")))?;
    assemble(pool, &group).await
}

pub async fn list_groups(
    pool: &PgPool,
    filter: &GroupFilterQuery,
    page: &PageQuery,
) -> Result<Paginated<GroupResponse>, ApiError> {
    page.validate()?;

    let groups =
        group_repo::list_groups(pool, filter.name.as_deref(), page.limit, page.offset()).await?;
    let total = group_repo::count_groups(pool, filter.name.as_deref()).await?;

    let mut items = Vec::with_capacity(groups.len());
    for group in &groups {
        items.push(assemble(pool, group).await?);
    }

    Ok(Paginated::new(items, page, total))
}

/// Build the read view from committed state. A device id whose target has
/// been deleted since is skipped; group membership rows are not scrubbed when
/// a device goes away.
pub(crate) async fn assemble(
    pool: &PgPool,
    group: &AccessControlGroup,
) -> Result<GroupResponse, ApiError> {
    let device_ids = group_repo::get_device_ids_by_group(pool, group.id).await?;
    let mut devices = Vec::with_capacity(device_ids.len());
    for device_id in device_ids {
        match device_repo::find_live_by_id(pool, device_id).await? {
            Some(d) => devices.push(DeviceInfo {
                id: d.id,
                name: d.name,
                host_address: d.host_address,
            }),
            None => {
                tracing::debug!(group_id = %group.id, %device_id, "skipping dangling device reference");
            }
        }
    }

    let schedules = group_repo::get_schedules_by_group(pool, group.id)
        .await?
        .into_iter()
        .map(|s| GroupScheduleView {
            day_of_week: s.day_of_week,
            date: s.date,
            start_time: s.start_time,
            end_time: s.end_time,
        })
        .collect();

    Ok(GroupResponse {
        id: group.id,
        name: group.name.clone(),
        devices,
        schedules,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedules_cover_every_weekday_all_day() {
        let schedules = default_schedules();
        assert_eq!(schedules.len(), 7);
        for (i, schedule) in schedules.iter().enumerate() {
            assert_eq!(schedule.day_of_week, i as i32 + 1);
            assert_eq!(schedule.date, None);
            assert_eq!(schedule.start_time, NaiveTime::MIN);
            assert_eq!(
                schedule.end_time,
                NaiveTime::from_hms_opt(23, 59, 59).unwrap()
            );
        }
    }

    #[test]
    fn test_expand_defaults_fills_absent_collections() {
        let mut req = GroupRequest {
            name: Some("lobby".to_string()),
            device_ids: None,
            schedules: None,
        };
        expand_defaults(&mut req);
        assert_eq!(req.device_ids, Some(Vec::new()));
        assert_eq!(req.schedules.as_ref().map(Vec::len), Some(7));
    }

    #[test]
    fn test_expand_defaults_keeps_explicit_empty_collections() {
        // Present-but-empty means "no children", not "apply the default".
        let mut req = GroupRequest {
            name: Some("lobby".to_string()),
            device_ids: Some(Vec::new()),
            schedules: Some(Vec::new()),
        };
        expand_defaults(&mut req);
        assert_eq!(req.device_ids.as_ref().map(Vec::len), Some(0));
        assert_eq!(req.schedules.as_ref().map(Vec::len), Some(0));
    }

    #[test]
    fn test_absent_vs_empty_distinction_survives_deserialization() {
        let absent: GroupRequest = serde_json::from_str(r#"{"name": "a"}"#).unwrap();
        assert!(absent.schedules.is_none());

        let empty: GroupRequest = serde_json::from_str(r#"{"name": "a", "schedules": []}"#).unwrap();
        assert_eq!(empty.schedules.as_ref().map(Vec::len), Some(0));
    }

    #[test]
    fn test_validate_schedules_rejects_bad_weekday() {
        let schedules = vec![GroupScheduleRequest {
            day_of_week: 8,
            date: None,
            start_time: NaiveTime::MIN,
            end_time: end_of_day(),
        }];
        assert!(validate_schedules(&schedules).is_err());
    }
}
