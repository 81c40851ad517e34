use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Permission flags; every omitted flag defaults to false on create and full
/// update, and keeps its current value on partial update.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPermissionRequest {
    #[serde(default)]
    pub people_permission: Option<bool>,
    #[serde(default)]
    pub device_permission: Option<bool>,
    #[serde(default)]
    pub rule_permission: Option<bool>,
    #[serde(default)]
    pub time_attendance_permission: Option<bool>,
    #[serde(default)]
    pub report_permission: Option<bool>,
    #[serde(default)]
    pub notification_permission: Option<bool>,
    #[serde(default)]
    pub system_log_permission: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub permission: Option<UserPermissionRequest>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilterQuery {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPermissionView {
    pub id: Uuid,
    pub people_permission: bool,
    pub device_permission: bool,
    pub rule_permission: bool,
    pub time_attendance_permission: bool,
    pub report_permission: bool,
    pub notification_permission: bool,
    pub system_log_permission: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub status: String,
    pub permission: UserPermissionView,
}
