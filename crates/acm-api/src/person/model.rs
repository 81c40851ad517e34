use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonCardRequest {
    pub card_number: String,
    #[serde(default)]
    pub active_at: Option<NaiveDate>,
    #[serde(default)]
    pub expire_at: Option<NaiveDate>,
}

/// Base64-encoded face image attachment. The file name only contributes its
/// extension; storage assigns a unique name.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceImageRequest {
    pub file_name: String,
    pub data: String,
}

/// Create/update payload for a person. Card and plate collections follow the
/// absent-vs-empty rule: `None` (field omitted) defaults to empty on create
/// and full update but leaves existing rows alone on partial update;
/// `Some(vec![])` always clears them.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub middle_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub person_type: Option<String>,
    #[serde(default)]
    pub person_code: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub job_position: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub mobile_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_verified: Option<bool>,
    #[serde(default)]
    pub active_at: Option<NaiveDate>,
    #[serde(default)]
    pub expire_at: Option<NaiveDate>,
    #[serde(default)]
    pub rule_id: Option<Uuid>,
    #[serde(default)]
    pub attendance_id: Option<Uuid>,
    #[serde(default)]
    pub cards: Option<Vec<PersonCardRequest>>,
    #[serde(default)]
    pub license_plates: Option<Vec<String>>,
    #[serde(default)]
    pub face_image: Option<FaceImageRequest>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonFilterQuery {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonCardView {
    pub card_number: String,
    pub active_at: Option<NaiveDate>,
    pub expire_at: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleInfo {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceInfo {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonResponse {
    pub id: Uuid,
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
    pub cards: Vec<PersonCardView>,
    pub license_plates: Vec<String>,
    pub rule: Option<RuleInfo>,
    pub attendance: Option<AttendanceInfo>,
}
