use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{auth::AuthUser, pagination::PageQuery, pagination::Paginated, state::ApiState};

use super::model::{GroupFilterQuery, GroupRequest, GroupResponse};
use super::service;
use crate::error::ApiError;

/// Create the access control group routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route(
            "/access-control-groups",
            get(list_groups).post(create_group),
        )
        .route(
            "/access-control-groups/{id}",
            get(get_group)
                .put(update_group)
                .patch(partial_update_group)
                .delete(delete_group),
        )
}

async fn list_groups(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Query(filter): Query<GroupFilterQuery>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paginated<GroupResponse>>, ApiError> {
    let result = service::list_groups(&state.pool, &filter, &page).await?;
    Ok(Json(result))
}

async fn get_group(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GroupResponse>, ApiError> {
    let result = service::get_group(&state.pool, id).await?;
    Ok(Json(result))
}

async fn create_group(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Json(payload): Json<GroupRequest>,
) -> Result<(StatusCode, Json<GroupResponse>), ApiError> {
    let result = service::create_group(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

async fn update_group(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<GroupRequest>,
) -> Result<Json<GroupResponse>, ApiError> {
    let result = service::update_group(&state.pool, id, payload).await?;
    Ok(Json(result))
}

async fn partial_update_group(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<GroupRequest>,
) -> Result<Json<GroupResponse>, ApiError> {
    let result = service::partial_update_group(&state.pool, id, payload).await?;
    Ok(Json(result))
}

async fn delete_group(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    service::delete_group(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
