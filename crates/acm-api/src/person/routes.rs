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

use super::model::{PersonFilterQuery, PersonRequest, PersonResponse};
use super::service;

/// Create the people routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/people", get(list_people).post(create_person))
        .route(
            "/people/{id}",
            get(get_person)
                .put(update_person)
                .patch(partial_update_person)
                .delete(delete_person),
        )
}

async fn list_people(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Query(filter): Query<PersonFilterQuery>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paginated<PersonResponse>>, ApiError> {
    let result = service::list_people(&state.pool, &filter, &page).await?;
    Ok(Json(result))
}

async fn get_person(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PersonResponse>, ApiError> {
    let result = service::get_person(&state.pool, id).await?;
    Ok(Json(result))
}

async fn create_person(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Json(payload): Json<PersonRequest>,
) -> Result<(StatusCode, Json<PersonResponse>), ApiError> {
    let result = service::create_person(&state.pool, &state.file_store, payload).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

async fn update_person(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PersonRequest>,
) -> Result<Json<PersonResponse>, ApiError> {
    let result = service::update_person(&state.pool, &state.file_store, id, payload).await?;
    Ok(Json(result))
}

async fn partial_update_person(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PersonRequest>,
) -> Result<Json<PersonResponse>, ApiError> {
    let result =
        service::partial_update_person(&state.pool, &state.file_store, id, payload).await?;
    Ok(Json(result))
}

async fn delete_person(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    service::delete_person(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
