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

use super::model::{RuleFilterQuery, RuleRequest, RuleResponse};
use super::service;

/// Create the access control rule routes
pub fn routes() -> Router<ApiState> {
    Router::new()
        .route("/access-control-rules", get(list_rules).post(create_rule))
        .route(
            "/access-control-rules/{id}",
            get(get_rule)
                .put(update_rule)
                .patch(partial_update_rule)
                .delete(delete_rule),
        )
}

async fn list_rules(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Query(filter): Query<RuleFilterQuery>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Paginated<RuleResponse>>, ApiError> {
    let result = service::list_rules(&state.pool, &filter, &page).await?;
    Ok(Json(result))
}

async fn get_rule(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RuleResponse>, ApiError> {
    let result = service::get_rule(&state.pool, id).await?;
    Ok(Json(result))
}

async fn create_rule(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Json(payload): Json<RuleRequest>,
) -> Result<(StatusCode, Json<RuleResponse>), ApiError> {
    let result = service::create_rule(&state.pool, payload).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

async fn update_rule(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RuleRequest>,
) -> Result<Json<RuleResponse>, ApiError> {
    let result = service::update_rule(&state.pool, id, payload).await?;
    Ok(Json(result))
}

async fn partial_update_rule(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RuleRequest>,
) -> Result<Json<RuleResponse>, ApiError> {
    let result = service::partial_update_rule(&state.pool, id, payload).await?;
    Ok(Json(result))
}

async fn delete_rule(
    _auth: AuthUser,
    State(state): State<ApiState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    service::delete_rule(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
