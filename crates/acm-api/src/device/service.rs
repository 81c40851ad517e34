use sqlx::PgPool;
use uuid::Uuid;

use acm_db::models::{AccessControlDevice, NewDevice};
use acm_db::repositories::{device as device_repo, server as server_repo};

use crate::error::ApiError;
use crate::pagination::{PageQuery, Paginated};
use crate::validation::require_name;

use super::model::{DeviceFilterQuery, DeviceRequest, DeviceResponse, ServerInfo};

const DEFAULT_STATUS: &str = "active";

fn build_new_device(req: &DeviceRequest) -> Result<NewDevice, ApiError> {
    let name = require_name(req.name.as_deref(), "device name")?;
    let device_type = require_name(req.device_type.as_deref(), "device type")?;
    let host_address = require_name(req.host_address.as_deref(), "device host address")?;

    Ok(NewDevice {
        name,
        device_type,
        host_address,
        username: req.username.clone(),
        password: req.password.clone(),
        access_token: req.access_token.clone(),
        api_token: req.api_token.clone(),
        server_id: req.server_id,
        record_scan: req.record_scan.unwrap_or(false),
        record_attendance: req.record_attendance.unwrap_or(false),
        allow_clock_in: req.allow_clock_in.unwrap_or(false),
        allow_clock_out: req.allow_clock_out.unwrap_or(false),
        status: req
            .status
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_STATUS)
            .to_string(),
    })
}

async fn validate_unique(
    pool: &PgPool,
    device: &NewDevice,
    exclude: Option<Uuid>,
) -> Result<(), ApiError> {
    if device_repo::name_exists(pool, &device.name, exclude).await? {
        return Err(ApiError::Duplicate {
            field: "name",
            value: device.name.clone(),
        });
    }
    if device_repo::host_address_exists(pool, &device.host_address, exclude).await? {
        return Err(ApiError::Duplicate {
            field: "host address",
            value: device.host_address.clone(),
        });
    }
    Ok(())
}

async fn validate_server_reference(
    pool: &PgPool,
    server_id: Option<Uuid>,
) -> Result<(), ApiError> {
    if let Some(server_id) = server_id {
        if !server_repo::exists_live(pool, server_id).await? {
            return Err(ApiError::NotFound(format!(
                "server with ID '{server_id}' not found"
            )));
        }
    }
    Ok(())
}

pub async fn create_device(pool: &PgPool, req: DeviceRequest) -> Result<DeviceResponse, ApiError> {
    let new_device = build_new_device(&req)?;
    validate_server_reference(pool, new_device.server_id).await?;
    validate_unique(pool, &new_device, None).await?;

    let device = device_repo::create_device(pool, &new_device).await?;
    assemble(pool, &device).await
}

pub async fn update_device(
    pool: &PgPool,
    id: Uuid,
    req: DeviceRequest,
) -> Result<DeviceResponse, ApiError> {
    let existing = device_repo::find_live_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("device with ID '{id}' not found")))?;

    let new_device = build_new_device(&req)?;
    validate_server_reference(pool, new_device.server_id).await?;
    validate_unique(pool, &new_device, Some(existing.id)).await?;

    let device = device_repo::update_device(pool, existing.id, &new_device).await?;
    assemble(pool, &device).await
}

pub async fn partial_update_device(
    pool: &PgPool,
    id: Uuid,
    req: DeviceRequest,
) -> Result<DeviceResponse, ApiError> {
    let existing = device_repo::find_live_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("device with ID '{id}' not found")))?;

    let merged = NewDevice {
        name: match req.name.as_deref() {
            Some(_) => require_name(req.name.as_deref(), "device name")?,
            None => existing.name.clone(),
        },
        device_type: match req.device_type.as_deref() {
            Some(_) => require_name(req.device_type.as_deref(), "device type")?,
            None => existing.device_type.clone(),
        },
        host_address: match req.host_address.as_deref() {
            Some(_) => require_name(req.host_address.as_deref(), "device host address")?,
            None => existing.host_address.clone(),
        },
        username: req.username.clone().or_else(|| existing.username.clone()),
        password: req.password.clone().or_else(|| existing.password.clone()),
        access_token: req
            .access_token
            .clone()
            .or_else(|| existing.access_token.clone()),
        api_token: req.api_token.clone().or_else(|| existing.api_token.clone()),
        server_id: req.server_id.or(existing.server_id),
        record_scan: req.record_scan.unwrap_or(existing.record_scan),
        record_attendance: req.record_attendance.unwrap_or(existing.record_attendance),
        allow_clock_in: req.allow_clock_in.unwrap_or(existing.allow_clock_in),
        allow_clock_out: req.allow_clock_out.unwrap_or(existing.allow_clock_out),
        status: match req.status.as_deref().filter(|s| !s.is_empty()) {
            Some(status) => status.to_string(),
            None => existing.status.clone(),
        },
    };

    validate_server_reference(pool, merged.server_id).await?;
    validate_unique(pool, &merged, Some(existing.id)).await?;

    let device = device_repo::update_device(pool, existing.id, &merged).await?;
    assemble(pool, &device).await
}

/// Devices have no owned children; delete is a plain soft delete. Group
/// membership rows pointing at the device are left in place and tolerated as
/// dangling references by the group view.
pub async fn delete_device(pool: &PgPool, id: Uuid) -> Result<(), ApiError> {
    let deleted = device_repo::soft_delete_device(pool, id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound(format!(
            "device with ID '{id}' not found"
        )));
    }
    Ok(())
}

pub async fn get_device(pool: &PgPool, id: Uuid) -> Result<DeviceResponse, ApiError> {
    let device = device_repo::find_live_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("device with ID '{id}' not found")))?;
    assemble(pool, &device).await
}

pub async fn list_devices(
    pool: &PgPool,
    filter: &DeviceFilterQuery,
    page: &PageQuery,
) -> Result<Paginated<DeviceResponse>, ApiError> {
    page.validate()?;

    let devices = device_repo::list_devices(
        pool,
        filter.name.as_deref(),
        filter.status.as_deref(),
        page.limit,
        page.offset(),
    )
    .await?;
    let total =
        device_repo::count_devices(pool, filter.name.as_deref(), filter.status.as_deref()).await?;

    let mut items = Vec::with_capacity(devices.len());
    for device in &devices {
        items.push(assemble(pool, device).await?);
    }

    Ok(Paginated::new(items, page, total))
}

/// Build the read view; a server reference that no longer resolves is simply
/// dropped.
pub(crate) async fn assemble(
    pool: &PgPool,
    device: &AccessControlDevice,
) -> Result<DeviceResponse, ApiError> {
    let server = match device.server_id {
        Some(server_id) => match server_repo::find_live_by_id(pool, server_id).await? {
            Some(s) => Some(ServerInfo {
                id: s.id,
                name: s.name,
                host_address: s.host_address,
            }),
            None => {
                tracing::debug!(device_id = %device.id, %server_id, "skipping dangling server reference");
                None
            }
        },
        None => None,
    };

    Ok(DeviceResponse {
        id: device.id,
        name: device.name.clone(),
        device_type: device.device_type.clone(),
        host_address: device.host_address.clone(),
        username: device.username.clone(),
        record_scan: device.record_scan,
        record_attendance: device.record_attendance,
        allow_clock_in: device.allow_clock_in,
        allow_clock_out: device.allow_clock_out,
        status: device.status.clone(),
        server,
    })
}
