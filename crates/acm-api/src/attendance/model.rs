use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Expected working window plus grace offsets; omitted grace values default
/// to zero minutes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceScheduleRequest {
    pub day_of_week: i32,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub early_in_minutes: Option<i32>,
    #[serde(default)]
    pub late_in_minutes: Option<i32>,
    #[serde(default)]
    pub early_out_minutes: Option<i32>,
    #[serde(default)]
    pub late_out_minutes: Option<i32>,
}

/// Create/update payload. `schedules: None` (field omitted) triggers the
/// seven-day full-coverage default; `Some(vec![])` means no schedules.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub schedules: Option<Vec<AttendanceScheduleRequest>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AttendanceFilterQuery {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceScheduleView {
    pub id: Uuid,
    pub day_of_week: i32,
    pub date: Option<NaiveDate>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub early_in_minutes: i32,
    pub late_in_minutes: i32,
    pub early_out_minutes: i32,
    pub late_out_minutes: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceResponse {
    pub id: Uuid,
    pub name: String,
    pub schedules: Vec<AttendanceScheduleView>,
}
