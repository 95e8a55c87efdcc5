pub mod activity;
pub mod config;
pub mod error;
pub mod gamification;
pub mod jobs;
pub mod metrics;
pub mod note;
pub mod quiz;
pub mod router;
pub mod state;
pub mod tracing;
pub mod user;

pub use config::ApiConfig;
pub use state::ApiState;
