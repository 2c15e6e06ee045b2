//! TrendSage API server - Entry Point

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use trendsage::config::{Config, RunMode};
use trendsage::{AppContext, TrendSageServer};

#[derive(Parser, Debug)]
#[command(name = "trendsage")]
#[command(about = "Market-trend research API backed by scholarly search and LLM synthesis")]
#[command(version)]
struct Cli {
    /// Veritus API key (optional, mock documents are served without it)
    #[arg(long, env = "VERITUS_API_KEY", hide_env_values = true)]
    veritus_api_key: Option<String>,

    /// OpenAI API key (optional, mock summaries are served without it)
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: Option<String>,

    /// HTTP server port
    #[arg(long, default_value = "3001", env = "PORT")]
    port: u16,

    /// Run mode; development masks provider failures with mock data
    #[arg(long, env = "TRENDSAGE_ENV", ignore_case = true)]
    mode: Option<RunMode>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before clap reads its env fallbacks.
    let dotenv_path = dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), env_file = ?dotenv_path, "Starting TrendSage");

    let mut config = Config::from_env()?;
    if cli.veritus_api_key.is_some() || cli.openai_api_key.is_some() {
        let overrides = Config::new(cli.veritus_api_key, cli.openai_api_key);
        config.veritus_api_key = overrides.veritus_api_key.or(config.veritus_api_key);
        config.openai_api_key = overrides.openai_api_key.or(config.openai_api_key);
    }
    if let Some(mode) = cli.mode {
        config = config.with_mode(mode);
    }

    tracing::info!(
        mode = ?config.mode,
        live_documents = config.has_document_credential(),
        live_llm = config.has_llm_credential(),
        model = %config.model,
        "Configuration loaded"
    );
    if config.is_development() {
        tracing::warn!("Development mode: provider failures will be masked with mock data");
    }

    let ctx = AppContext::from_config(&config)?;
    TrendSageServer::new(ctx).run_http(cli.port).await
}
