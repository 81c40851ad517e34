use axum::{Router, http::StatusCode, response::IntoResponse, routing::get};

use crate::{attendance, auth, device, group, person, rule, server, state::ApiState, user};

pub fn router() -> Router<ApiState> {
    let api = Router::new()
        .merge(server::routes())
        .merge(device::routes())
        .merge(group::routes())
        .merge(rule::routes())
        .merge(attendance::routes())
        .merge(person::routes())
        .merge(user::routes());

    Router::new()
        .route("/health", get(health))
        .merge(auth::routes())
        .nest("/api", api)
        .fallback(handler_404)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn handler_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        "The requested resource was not found",
    )
}
