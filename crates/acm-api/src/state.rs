use axum::extract::FromRef;
use sqlx::PgPool;

use crate::{config::ApiConfig, config::Environment, storage::FileStore};

#[derive(Clone)]
pub struct ApiState {
    pub pool: PgPool,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    pub bcrypt_cost: u32,
    pub environment: Environment,
    pub file_store: FileStore,
}

impl ApiState {
    pub fn new(config: &ApiConfig, pool: PgPool) -> Self {
        Self {
            pool,
            jwt_secret: config.jwt_secret.clone(),
            jwt_expiry_hours: config.jwt_expiry_hours,
            bcrypt_cost: config.bcrypt_cost,
            environment: config.env,
            file_store: FileStore::new(&config.upload_dir),
        }
    }
}

/// The slice of state the auth extractor needs.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

impl FromRef<ApiState> for AuthConfig {
    fn from_ref(state: &ApiState) -> Self {
        Self {
            jwt_secret: state.jwt_secret.clone(),
        }
    }
}
