pub mod analysis;
pub mod app_config;
pub mod config;
pub mod geo_lite;
pub mod score;

pub use analysis::{AnalysisJob, AnalysisResult, JobStatus, ProviderScore, Tier};
pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo_lite::{Breakdown, Confidence, GeoLiteResult};
pub use score::ScoreLevel;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
