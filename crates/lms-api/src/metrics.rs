//! Prometheus metrics for the gamification domain.
//!
//! Counters are recorded at the facade layer; the binary exposes the rendered
//! registry on `/metrics`.

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and return the render handle.
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    Ok(handle)
}

pub fn record_points_awarded(category: &'static str, points: i64) {
    counter!("gamification_points_awarded_total", "category" => category)
        .increment(points.max(0) as u64);
}

pub fn record_achievement_granted(rarity: &'static str) {
    counter!("gamification_achievements_granted_total", "rarity" => rarity).increment(1);
}

pub fn record_badge_granted() {
    counter!("gamification_badges_granted_total").increment(1);
}

pub fn record_leaderboard_rebuild(kind: &'static str, category: &'static str) {
    counter!(
        "gamification_leaderboard_rebuilds_total",
        "kind" => kind,
        "category" => category
    )
    .increment(1);
}
