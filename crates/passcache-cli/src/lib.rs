//! passcache command-line interface.

pub mod commands;
pub mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use passcache_cache::CacheManager;
use passcache_core::config::{Config, PathOverrides, ResolvedPaths};
use passcache_core::env::vars;
use passcache_core::paths;

/// passcache - encrypted, self-refreshing cache of a password manager export
#[derive(Parser)]
#[command(name = "passcache")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file
    #[arg(short, long, env = vars::PASSCACHE_CONFIG, global = true)]
    pub config: Option<PathBuf>,

    /// Source export file (overrides the config file)
    #[arg(long, env = vars::PASSCACHE_SOURCE, global = true)]
    pub source: Option<PathBuf>,

    /// Snapshot cache file (overrides the config file)
    #[arg(long, env = vars::PASSCACHE_CACHE_FILE, global = true)]
    pub cache_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// List cached records
    List(commands::list::ListArgs),

    /// Show one record in detail
    Show(commands::show::ShowArgs),

    /// Rebuild the cache from the source file
    Refresh,

    /// Delete the cache file
    Clear,

    /// Show cache paths and freshness
    Status,

    /// Configuration management
    Config(commands::config::ConfigArgs),

    /// Show version information
    Version,
}

/// Configuration and resolved paths for one invocation.
pub struct Context {
    /// Config file this invocation reads and writes.
    pub config_path: PathBuf,
    pub config: Config,
    pub paths: ResolvedPaths,
}

impl Context {
    /// Load the config and resolve paths, applying CLI overrides.
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let config_path = match &cli.config {
            Some(path) => path.clone(),
            None => paths::config_file()?,
        };
        let config = Config::load_or_default(Some(&config_path))?;
        let overrides = PathOverrides {
            source: cli.source.clone(),
            cache_file: cli.cache_file.clone(),
        };
        let paths = config.resolve(&overrides)?;
        Ok(Self {
            config_path,
            config,
            paths,
        })
    }

    /// Build the cache manager for the resolved paths.
    pub fn manager(&self) -> anyhow::Result<CacheManager> {
        Ok(CacheManager::from_paths(&self.paths)?)
    }
}

/// Run the CLI with the given arguments.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    if matches!(cli.command, Commands::Version) {
        println!("passcache {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Config commands must work even when the current config cannot resolve.
    if let Commands::Config(args) = cli.command {
        let config_path = match cli.config {
            Some(path) => path,
            None => paths::config_file()?,
        };
        return commands::config::run(args, &config_path).await;
    }

    let ctx = Context::load(&cli)?;
    match cli.command {
        Commands::List(args) => commands::list::run(args, &ctx).await,
        Commands::Show(args) => commands::show::run(args, &ctx).await,
        Commands::Refresh => commands::cache::refresh(&ctx).await,
        Commands::Clear => commands::cache::clear(&ctx).await,
        Commands::Status => commands::cache::status(&ctx).await,
        Commands::Config(_) | Commands::Version => Ok(()),
    }
}
