use todoapp::commands::Cli;
use todoapp::libs::config::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG wins over the configured level.
    let log_level = Config::load().map(|config| config.log_level).unwrap_or_else(|_| "info".to_string());
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    Cli::menu().await
}
