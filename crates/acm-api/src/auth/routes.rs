use axum::{Json, Router, extract::State, routing::post};
use serde::{Deserialize, Serialize};

use acm_db::repositories::user as user_repo;

use super::jwt::generate_jwt_token;
use crate::{error::ApiError, state::ApiState};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

pub fn routes() -> Router<ApiState> {
    Router::new().route("/login", post(login))
}

/// Verify credentials against the users table and issue a JWT.
///
/// Bad username and bad password produce the same response so the endpoint
/// doesn't leak which accounts exist.
async fn login(
    State(state): State<ApiState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = user_repo::find_live_by_username(&state.pool, &payload.username)
        .await?
        .ok_or_else(|| ApiError::Auth("Invalid credentials".to_string()))?;

    let verified = bcrypt::verify(&payload.password, &user.password_hash)?;
    if !verified {
        return Err(ApiError::Auth("Invalid credentials".to_string()));
    }

    if user.status != "active" {
        return Err(ApiError::Auth("Account is not active".to_string()));
    }

    let token = generate_jwt_token(
        user.id,
        user.username,
        &state.jwt_secret,
        state.jwt_expiry_hours,
    )?;

    Ok(Json(LoginResponse { token }))
}
