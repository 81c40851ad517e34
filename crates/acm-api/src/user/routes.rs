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

use super::model::{UserFilterQuery, UserRequest, UserResponse};
use super::service;

/// Create the user routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user)
                .put(update_user)
                .patch(partial_update_user)
                .delete(delete_user),
        )
}

async fn list_users(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Query(filter): Query<UserFilterQuery>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paginated<UserResponse>>, ApiError> {
    let result = service::list_users(&state.pool, &filter, &page).await?;
    Ok(Json(result))
}

async fn get_user(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    let result = service::get_user(&state.pool, id).await?;
    Ok(Json(result))
}

async fn create_user(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Json(payload): Json<UserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let result = service::create_user(&state.pool, state.bcrypt_cost, payload).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

async fn update_user(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let result = service::update_user(&state.pool, state.bcrypt_cost, id, payload).await?;
    Ok(Json(result))
}

async fn partial_update_user(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let result = service::partial_update_user(&state.pool, state.bcrypt_cost, id, payload).await?;
    Ok(Json(result))
}

async fn delete_user(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    service::delete_user(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
