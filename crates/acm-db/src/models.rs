use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Access control server - an upstream controller devices can be attached to
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AccessControlServer {
    /// Unique server identifier
    pub id: Uuid,
    /// Display name, unique among live servers
    pub name: String,
    /// Network address, unique among live servers
    pub host_address: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub access_token: Option<String>,
    pub api_token: Option<String>,
    /// Operational status ("active", "inactive", ...)
    pub status: String,
    /// Last successful synchronization with the physical server
    pub last_sync_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft-delete marker; set means the row is excluded from live queries
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Access control device - a door reader, turnstile or camera endpoint
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AccessControlDevice {
    pub id: Uuid,
    /// Display name, unique among live devices
    pub name: String,
    pub device_type: String,
    /// Network address, unique among live devices
    pub host_address: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub access_token: Option<String>,
    pub api_token: Option<String>,
    /// Owning server; validated in code, no FK constraint
    pub server_id: Option<Uuid>,
    pub record_scan: bool,
    pub record_attendance: bool,
    pub allow_clock_in: bool,
    pub allow_clock_out: bool,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Access control group - a named set of devices with access windows
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AccessControlGroup {
    pub id: Uuid,
    /// Display name, unique among live groups
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Group-device membership row, owned exclusively by its group
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GroupDevice {
    pub id: Uuid,
    pub group_id: Uuid,
    pub device_id: Uuid,
}

/// Access window for a group: a weekday (1 = Monday .. 7 = Sunday) or an
/// explicit date, spanning start_time..end_time
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GroupSchedule {
    pub id: Uuid,
    pub group_id: Uuid,
    pub day_of_week: i32,
    pub date: Option<NaiveDate>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Access control rule - a named set of groups assignable to people
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AccessControlRule {
    pub id: Uuid,
    /// Display name, unique among live rules
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Rule-group link row, owned exclusively by its rule
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RuleGroup {
    pub id: Uuid,
    pub rule_id: Uuid,
    pub group_id: Uuid,
}

/// Attendance definition - a named working-time policy
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Attendance {
    pub id: Uuid,
    /// Display name, unique among live attendance definitions
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Expected attendance window plus grace offsets in minutes around clock
/// in/out
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AttendanceSchedule {
    pub id: Uuid,
    pub attendance_id: Uuid,
    pub day_of_week: i32,
    pub date: Option<NaiveDate>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub early_in_minutes: i32,
    pub late_in_minutes: i32,
    pub early_out_minutes: i32,
    pub late_out_minutes: i32,
}

/// Person - an employee or visitor managed by the system
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Person {
    pub id: Uuid,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    /// "employee" or "visitor"
    pub person_type: String,
    /// External badge/employee identifier, unique among live people when set
    pub person_code: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub company: Option<String>,
    pub department: Option<String>,
    pub job_position: Option<String>,
    pub address: Option<String>,
    pub mobile_number: Option<String>,
    pub email: Option<String>,
    /// Path in the file store; managed outside the database transaction
    pub face_image_path: Option<String>,
    pub is_verified: bool,
    pub active_at: Option<NaiveDate>,
    pub expire_at: Option<NaiveDate>,
    /// Assigned access rule; validated in code, no FK constraint
    pub rule_id: Option<Uuid>,
    /// Assigned attendance definition; validated in code, no FK constraint
    pub attendance_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Identity card owned by a person; card numbers are globally unique
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PersonCard {
    pub id: Uuid,
    pub person_id: Uuid,
    pub card_number: String,
    pub active_at: Option<NaiveDate>,
    pub expire_at: Option<NaiveDate>,
}

/// License plate owned by a person; plate texts are globally unique
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PersonLicensePlate {
    pub id: Uuid,
    pub person_id: Uuid,
    pub plate_text: String,
}

/// Administrative user account
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    /// Login name, unique among live users
    pub username: String,
    pub password_hash: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Capability flags for a user; exactly one row per user, replaced wholesale
/// on every full update
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserPermission {
    pub id: Uuid,
    pub user_id: Uuid,
    pub people_permission: bool,
    pub device_permission: bool,
    pub rule_permission: bool,
    pub time_attendance_permission: bool,
    pub report_permission: bool,
    pub notification_permission: bool,
    pub system_log_permission: bool,
}

// Insert specs: fully-resolved values for a row about to be written. The
// service layer maps validated, defaulted requests into these before handing
// them to a repository function.

#[derive(Debug, Clone)]
pub struct NewServer {
    pub name: String,
    pub host_address: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub access_token: Option<String>,
    pub api_token: Option<String>,
    pub status: String,
}

#[derive(Debug, Clone)]
pub struct NewDevice {
    pub name: String,
    pub device_type: String,
    pub host_address: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub access_token: Option<String>,
    pub api_token: Option<String>,
    pub server_id: Option<Uuid>,
    pub record_scan: bool,
    pub record_attendance: bool,
    pub allow_clock_in: bool,
    pub allow_clock_out: bool,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGroupSchedule {
    pub day_of_week: i32,
    pub date: Option<NaiveDate>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttendanceSchedule {
    pub day_of_week: i32,
    pub date: Option<NaiveDate>,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub early_in_minutes: i32,
    pub late_in_minutes: i32,
    pub early_out_minutes: i32,
    pub late_out_minutes: i32,
}

#[derive(Debug, Clone)]
pub struct NewPerson {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub person_type: String,
    pub person_code: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub company: Option<String>,
    pub department: Option<String>,
    pub job_position: Option<String>,
    pub address: Option<String>,
    pub mobile_number: Option<String>,
    pub email: Option<String>,
    pub face_image_path: Option<String>,
    pub is_verified: bool,
    pub active_at: Option<NaiveDate>,
    pub expire_at: Option<NaiveDate>,
    pub rule_id: Option<Uuid>,
    pub attendance_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct NewPersonCard {
    pub card_number: String,
    pub active_at: Option<NaiveDate>,
    pub expire_at: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NewUserPermission {
    pub people_permission: bool,
    pub device_permission: bool,
    pub rule_permission: bool,
    pub time_attendance_permission: bool,
    pub report_permission: bool,
    pub notification_permission: bool,
    pub system_log_permission: bool,
}
