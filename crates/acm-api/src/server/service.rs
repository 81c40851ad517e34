use sqlx::PgPool;
use uuid::Uuid;

use acm_db::models::{AccessControlServer, NewServer};
use acm_db::repositories::server as server_repo;

use crate::error::ApiError;
use crate::pagination::{PageQuery, Paginated};
use crate::validation::require_name;

use super::model::{ServerFilterQuery, ServerRequest, ServerResponse};

const DEFAULT_STATUS: &str = "active";

fn build_new_server(req: &ServerRequest) -> Result<NewServer, ApiError> {
    let name = require_name(req.name.as_deref(), "server name")?;
    let host_address = require_name(req.host_address.as_deref(), "server host address")?;

    Ok(NewServer {
        name,
        host_address,
        username: req.username.clone(),
        password: req.password.clone(),
        access_token: req.access_token.clone(),
        api_token: req.api_token.clone(),
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
    server: &NewServer,
    exclude: Option<Uuid>,
) -> Result<(), ApiError> {
    if server_repo::name_exists(pool, &server.name, exclude).await? {
        return Err(ApiError::Duplicate {
            field: "name",
            value: server.name.clone(),
        });
    }
    if server_repo::host_address_exists(pool, &server.host_address, exclude).await? {
        return Err(ApiError::Duplicate {
            field: "host address",
            value: server.host_address.clone(),
        });
    }
    Ok(())
}

pub async fn create_server(pool: &PgPool, req: ServerRequest) -> Result<ServerResponse, ApiError> {
    let new_server = build_new_server(&req)?;
    validate_unique(pool, &new_server, None).await?;

    let server = server_repo::create_server(pool, &new_server).await?;
    Ok(to_response(&server))
}

pub async fn update_server(
    pool: &PgPool,
    id: Uuid,
    req: ServerRequest,
) -> Result<ServerResponse, ApiError> {
    let existing = server_repo::find_live_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("server with ID '{id}' not found")))?;

    let new_server = build_new_server(&req)?;
    validate_unique(pool, &new_server, Some(existing.id)).await?;

    let server = server_repo::update_server(pool, existing.id, &new_server).await?;
    Ok(to_response(&server))
}

pub async fn partial_update_server(
    pool: &PgPool,
    id: Uuid,
    req: ServerRequest,
) -> Result<ServerResponse, ApiError> {
    let existing = server_repo::find_live_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("server with ID '{id}' not found")))?;

    let merged = NewServer {
        name: match req.name.as_deref() {
            Some(_) => require_name(req.name.as_deref(), "server name")?,
            None => existing.name.clone(),
        },
        host_address: match req.host_address.as_deref() {
            Some(_) => require_name(req.host_address.as_deref(), "server host address")?,
            None => existing.host_address.clone(),
        },
        username: req.username.clone().or_else(|| existing.username.clone()),
        password: req.password.clone().or_else(|| existing.password.clone()),
        access_token: req
            .access_token
            .clone()
            .or_else(|| existing.access_token.clone()),
        api_token: req.api_token.clone().or_else(|| existing.api_token.clone()),
        status: match req.status.as_deref().filter(|s| !s.is_empty()) {
            Some(status) => status.to_string(),
            None => existing.status.clone(),
        },
    };

    validate_unique(pool, &merged, Some(existing.id)).await?;

    let server = server_repo::update_server(pool, existing.id, &merged).await?;
    Ok(to_response(&server))
}

/// Servers have no owned children; delete is a plain soft delete. Devices
/// pointing at the server keep their reference, which the device view then
/// drops as dangling.
pub async fn delete_server(pool: &PgPool, id: Uuid) -> Result<(), ApiError> {
    let deleted = server_repo::soft_delete_server(pool, id).await?;
    if deleted == 0 {
        return Err(ApiError::NotFound(format!(
            "server with ID '{id}' not found"
        )));
    }
    Ok(())
}

pub async fn get_server(pool: &PgPool, id: Uuid) -> Result<ServerResponse, ApiError> {
    let server = server_repo::find_live_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("server with ID '{id}' not found")))?;
    Ok(to_response(&server))
}

pub async fn list_servers(
    pool: &PgPool,
    filter: &ServerFilterQuery,
    page: &PageQuery,
) -> Result<Paginated<ServerResponse>, ApiError> {
    page.validate()?;

    let servers =
        server_repo::list_servers(pool, filter.name.as_deref(), page.limit, page.offset()).await?;
    let total = server_repo::count_servers(pool, filter.name.as_deref()).await?;

    let items = servers.iter().map(to_response).collect();
    Ok(Paginated::new(items, page, total))
}

fn to_response(server: &AccessControlServer) -> ServerResponse {
    ServerResponse {
        id: server.id,
        name: server.name.clone(),
        host_address: server.host_address.clone(),
        username: server.username.clone(),
        status: server.status.clone(),
        last_sync_at: server.last_sync_at,
    }
}
