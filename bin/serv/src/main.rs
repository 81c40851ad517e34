use acm_api::{config::ApiConfig, state::ApiState};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment variables
    dotenvy::dotenv().ok();
    let config = ApiConfig::from_env()?;

    acm_api::tracing::init_tracing(&config.env);

    // Connect and migrate before accepting traffic
    let pool = acm_db::create_pool(&config.database_url, 10).await?;
    acm_db::ensure_db_and_migrate(&config.database_url, &pool).await?;

    let state = ApiState::new(&config, pool);

    // Create the application router
    let app = acm_api::router::router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive());

    // Start the server
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    tracing::info!("Server running on http://{}", config.bind_address);
    axum::serve(listener, app).await?;

    Ok(())
}
