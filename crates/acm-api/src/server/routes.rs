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

use super::model::{ServerFilterQuery, ServerRequest, ServerResponse};
use super::service;

/// Create the access control server routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route(
            "/access-control-servers",
            get(list_servers).post(create_server),
        )
        .route(
            "/access-control-servers/{id}",
            get(get_server)
                .put(update_server)
                .patch(partial_update_server)
                .delete(delete_server),
        )
}

async fn list_servers(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Query(filter): Query<ServerFilterQuery>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paginated<ServerResponse>>, ApiError> {
    let result = service::list_servers(&state.pool, &filter, &page).await?;
    Ok(Json(result))
}

async fn get_server(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ServerResponse>, ApiError> {
    let result = service::get_server(&state.pool, id).await?;
    Ok(Json(result))
}

async fn create_server(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Json(payload): Json<ServerRequest>,
) -> Result<(StatusCode, Json<ServerResponse>), ApiError> {
    let result = service::create_server(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

async fn update_server(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ServerRequest>,
) -> Result<Json<ServerResponse>, ApiError> {
    let result = service::update_server(&state.pool, id, payload).await?;
    Ok(Json(result))
}

async fn partial_update_server(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ServerRequest>,
) -> Result<Json<ServerResponse>, ApiError> {
    let result = service::partial_update_server(&state.pool, id, payload).await?;
    Ok(Json(result))
}

async fn delete_server(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    service::delete_server(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
