use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub device_type: Option<String>,
    #[serde(default)]
    pub host_address: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default)]
    pub server_id: Option<Uuid>,
    #[serde(default)]
    pub record_scan: Option<bool>,
    #[serde(default)]
    pub record_attendance: Option<bool>,
    #[serde(default)]
    pub allow_clock_in: Option<bool>,
    #[serde(default)]
    pub allow_clock_out: Option<bool>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceFilterQuery {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    pub id: Uuid,
    pub name: String,
    pub host_address: String,
}

/// Read view; credentials are never echoed back.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceResponse {
    pub id: Uuid,
    pub name: String,
    pub device_type: String,
    pub host_address: String,
    pub username: Option<String>,
    pub record_scan: bool,
    pub record_attendance: bool,
    pub allow_clock_in: bool,
    pub allow_clock_out: bool,
    pub status: String,
    pub server: Option<ServerInfo>,
}
