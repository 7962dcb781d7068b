mod analyze;
mod render;
mod scout;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "geoscout")]
#[command(about = "Check how visible a brand is in AI assistant answers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a full analysis against the analysis backend and wait for the result
    Analyze {
        /// Brand name or domain (e.g., nike.com)
        input: String,
        /// Request the free tier
        #[arg(long)]
        free: bool,
        /// Print the decoded result as JSON instead of the report
        #[arg(long)]
        json: bool,
    },
    /// Look up the quick free-tier score from a geoscout server
    Scout {
        /// Brand name (e.g., Nike)
        brand: String,
        /// Server base URL; defaults to `GEOSCOUT_SERVER_URL`
        #[arg(long)]
        server_url: Option<String>,
        /// Print the raw score as JSON instead of the card
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = geoscout_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Analyze { input, free, json } => {
            analyze::run_analyze(&config, &input, free, json).await
        }
        Commands::Scout {
            brand,
            server_url,
            json,
        } => {
            let server_url = server_url.unwrap_or_else(|| config.server_url.clone());
            scout::run_scout(&config, &server_url, &brand, json).await
        }
    }
}
