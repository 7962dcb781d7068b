pub mod client;
pub mod error;
pub mod session;
pub mod types;

pub use client::{AnalysisApi, AnalyzerClient};
pub use error::AnalyzerError;
pub use session::{AnalysisSession, PollConfig, SessionState, MIN_POLL_INTERVAL};
