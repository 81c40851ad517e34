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

use super::model::{AttendanceFilterQuery, AttendanceRequest, AttendanceResponse};
use super::service;

/// Create the attendance routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/attendances", get(list_attendances).post(create_attendance))
        .route(
            "/attendances/{id}",
            get(get_attendance)
                .put(update_attendance)
                .patch(partial_update_attendance)
                .delete(delete_attendance),
        )
}

async fn list_attendances(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Query(filter): Query<AttendanceFilterQuery>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paginated<AttendanceResponse>>, ApiError> {
    let result = service::list_attendances(&state.pool, &filter, &page).await?;
    Ok(Json(result))
}

async fn get_attendance(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AttendanceResponse>, ApiError> {
    let result = service::get_attendance(&state.pool, id).await?;
    Ok(Json(result))
}

async fn create_attendance(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Json(payload): Json<AttendanceRequest>,
) -> Result<(StatusCode, Json<AttendanceResponse>), ApiError> {
    let result = service::create_attendance(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

async fn update_attendance(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AttendanceRequest>,
) -> Result<Json<AttendanceResponse>, ApiError> {
    let result = service::update_attendance(&state.pool, id, payload).await?;
    Ok(Json(result))
}

async fn partial_update_attendance(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AttendanceRequest>,
) -> Result<Json<AttendanceResponse>, ApiError> {
    let result = service::partial_update_attendance(&state.pool, id, payload).await?;
    Ok(Json(result))
}

async fn delete_attendance(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    service::delete_attendance(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
