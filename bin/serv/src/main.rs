use axum::routing::get;
use lms_api::{config::ApiConfig, state::ApiState};
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment variables
    dotenvy::dotenv().ok();
    let config = ApiConfig::from_env()?;

    lms_api::tracing::init_tracing(config.env);

    // Database pool, migrations, and the default achievement/badge catalog
    let pool = lms_db::create_pool(&config.database_url, config.max_db_connections).await?;
    lms_db::ensure_db_and_migrate(&config.database_url, &pool).await?;
    lms_db::catalog::ensure_default_catalog(&pool).await?;

    let metrics_handle = lms_api::metrics::init_metrics()?;

    let state = ApiState::new(pool.clone(), config.env);

    // Periodic leaderboard rebuilds run for the lifetime of the process
    let _jobs = lms_api::jobs::start_background_jobs(pool);

    let app = lms_api::router::router()
        .with_state(state)
        .route(
            "/metrics",
            get(move || {
                let handle = metrics_handle.clone();
                async move { handle.render() }
            }),
        )
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("server listening on {}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
