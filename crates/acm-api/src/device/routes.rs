use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    auth::AuthUser,
    error::ApiError,
    pagination::{PageQuery, Paginated},
    state::ApiState,
};

use super::model::{DeviceFilterQuery, DeviceRequest, DeviceResponse};
use super::service;

/// Create the access control device routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route(
            "/access-control-devices",
            get(list_devices).post(create_device),
        )
        .route(
            "/access-control-devices/{id}",
            get(get_device)
                .put(update_device)
                .patch(partial_update_device)
                .delete(delete_device),
        )
}

async fn list_devices(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Query(filter): Query<DeviceFilterQuery>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paginated<DeviceResponse>>, ApiError> {
    let result = service::list_devices(&state.pool, &filter, &page).await?;
    Ok(Json(result))
}

async fn get_device(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeviceResponse>, ApiError> {
    let result = service::get_device(&state.pool, id).await?;
    Ok(Json(result))
}

async fn create_device(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Json(payload): Json<DeviceRequest>,
) -> Result<(StatusCode, Json<DeviceResponse>), ApiError> {
    let result = service::create_device(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

async fn update_device(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DeviceRequest>,
) -> Result<Json<DeviceResponse>, ApiError> {
    let result = service::update_device(&state.pool, id, payload).await?;
    Ok(Json(result))
}

async fn partial_update_device(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DeviceRequest>,
) -> Result<Json<DeviceResponse>, ApiError> {
    let result = service::partial_update_device(&state.pool, id, payload).await?;
    Ok(Json(result))
}

async fn delete_device(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    service::delete_device(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
