//! Background jobs for periodic maintenance tasks.
//!
//! The leaderboard builder is a full recomputation triggered from outside the
//! gamification core; this module is that trigger when the server runs
//! standalone. Operators can also hit the rebuild endpoint directly.

use chrono::Utc;
use sqlx::PgPool;
use std::time::Duration;
use tokio::time::interval;

use crate::gamification::service;

/// Start all background jobs
///
/// Returns a vector of join handles that can be awaited on shutdown
pub fn start_background_jobs(pool: PgPool) -> Vec<tokio::task::JoinHandle<()>> {
    vec![tokio::spawn(periodic_leaderboard_rebuild_job(pool))]
}

/// Rebuild every leaderboard once shortly after startup, then hourly.
async fn periodic_leaderboard_rebuild_job(pool: PgPool) {
    // Short delay so startup migrations and seeding finish first
    tokio::time::sleep(Duration::from_secs(60)).await;

    let mut interval = interval(Duration::from_secs(3600));

    loop {
        interval.tick().await;

        let as_of = Utc::now().date_naive();
        match service::rebuild_leaderboards(&pool, as_of).await {
            Ok(()) => {
                tracing::info!(%as_of, "periodic leaderboard rebuild complete");
            }
            Err(e) => {
                tracing::error!("periodic leaderboard rebuild failed: {e}");
            }
        }
    }
}
