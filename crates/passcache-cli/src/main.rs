//! passcache CLI entry point.

use clap::Parser;
use passcache_cli::{run, Cli};
use passcache_core::config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging. RUST_LOG wins, then -v, then the config file.
    let level = match cli.verbose {
        0 => Config::load_or_default(cli.config.as_deref())
            .map(|c| c.logging.level.as_str())
            .unwrap_or("info"),
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("passcache={level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Run the command
    run(cli).await
}
