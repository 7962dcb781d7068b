//! `analyze` command: one submit-then-poll flow against the analysis backend.

use geoscout_analyzer::{AnalysisSession, AnalyzerClient, AnalyzerError, PollConfig};
use geoscout_core::{AppConfig, Tier};

use crate::render::Report;

/// Runs one analysis for `input` and prints the report.
///
/// Blank input prints a prompt and succeeds without calling the backend.
/// Ctrl-C while the flow is running cancels it.
///
/// # Errors
///
/// Returns the user-facing failure message if the client cannot be built or
/// the flow fails, times out, or is cancelled.
pub(crate) async fn run_analyze(
    config: &AppConfig,
    input: &str,
    free: bool,
    json: bool,
) -> anyhow::Result<()> {
    if input.trim().is_empty() {
        eprintln!("Please enter your brand name");
        return Ok(());
    }

    let client = AnalyzerClient::from_config(config)?;
    let poll = PollConfig::from_config(config).with_tier(free.then_some(Tier::Free));
    let session = AnalysisSession::new(client, poll);

    eprintln!("Analyzing {}...", input.trim());
    let outcome = tokio::select! {
        outcome = session.submit(input) => outcome,
        _ = tokio::signal::ctrl_c() => {
            session.cancel();
            Err(AnalyzerError::Superseded)
        }
    };

    match outcome {
        Ok(Some(result)) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", Report(&result));
            }
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(e) => {
            tracing::debug!(error = %e, "analyze command failed");
            anyhow::bail!("{}", e.user_message())
        }
    }
}
