use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One access window in a group request: a weekday (1 = Monday .. 7 = Sunday)
/// with an optional explicit date override.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupScheduleRequest {
    pub day_of_week: i32,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Create/update payload for an access control group.
///
/// The child collections are `Option<Vec<_>>` on purpose: an absent field
/// (`None`) triggers policy defaulting on create and full update, while an
/// explicit `[]` means "no children". The two must never be conflated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub device_ids: Option<Vec<Uuid>>,
    #[serde(default)]
    pub schedules: Option<Vec<GroupScheduleRequest>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupFilterQuery {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    pub id: Uuid,
    pub name: String,
    pub host_address: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupScheduleView {
    pub day_of_week: i32,
    pub date: Option<NaiveDate>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Denormalized read view of a group with its resolved device info and
/// schedule windows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupResponse {
    pub id: Uuid,
    pub name: String,
    pub devices: Vec<DeviceInfo>,
    pub schedules: Vec<GroupScheduleView>,
}
