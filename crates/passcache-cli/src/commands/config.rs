//! Configuration management commands.

use std::path::Path;

use clap::Args;
use passcache_core::config::Config;
use passcache_core::paths;

/// Config command arguments.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(clap::Subcommand)]
pub enum ConfigCommand {
    /// Show configuration
    Show,

    /// Get a configuration value
    Get {
        /// Configuration key (dot-separated path)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,

        /// Value to set
        value: String,
    },

    /// Point the cache at a source export file
    SetSource {
        /// Path to the export file (`~` is expanded)
        path: String,
    },

    /// Initialize configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration file path
    Path,

    /// Validate configuration
    Validate,
}

/// Run the config command against the config file at `config_path`.
pub async fn run(args: ConfigArgs, config_path: &Path) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = Config::load_or_default(Some(config_path))?;
            println!("{}", config.to_json5()?);
        }

        ConfigCommand::Get { key } => {
            let config = Config::load_or_default(Some(config_path))?;
            let json = serde_json::to_value(&config)?;

            match get_path(&json, &key) {
                Some(v) => println!("{}", serde_json::to_string_pretty(v)?),
                None => anyhow::bail!("Key not found: {}", key),
            }
        }

        ConfigCommand::Set { key, value } => {
            let config = Config::load_or_default(Some(config_path))?;
            let updated = set_path(&config, &key, &value)?;
            updated.validate()?;
            updated.save(config_path)?;

            println!("Set {} = {}", key, value);
        }

        ConfigCommand::SetSource { path } => {
            let mut config = Config::load_or_default(Some(config_path))?;
            let source = paths::absolutize(&paths::expand_tilde(path.trim()));
            if !source.is_file() {
                eprintln!(
                    "{} {} does not exist yet; it will be read on the next load",
                    console::style("!").yellow(),
                    source.display()
                );
            }
            config.set_source(&source);
            config.validate()?;
            config.save(config_path)?;

            println!("Source set to {}", source.display());
        }

        ConfigCommand::Init { force } => {
            if config_path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists: {}. Use --force to overwrite.",
                    config_path.display()
                );
            }

            Config::default().save(config_path)?;

            println!("Created config file: {}", config_path.display());
            println!("  Tip: Run 'passcache config set-source <FILE>' next.");
        }

        ConfigCommand::Path => {
            println!("{}", config_path.display());
        }

        ConfigCommand::Validate => match Config::load(config_path) {
            Ok(config) => match config.validate() {
                Ok(()) => println!("Configuration is valid"),
                Err(e) => anyhow::bail!("Configuration error: {}", e),
            },
            Err(e) => anyhow::bail!("Failed to load config: {}", e),
        },
    }

    Ok(())
}

/// Walk a dot-separated key path through a JSON value.
fn get_path<'a>(json: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
    key.split('.').try_fold(json, |acc, k| acc.get(k))
}

/// Return a copy of `config` with `key` set to `value`.
///
/// The value is parsed as JSON first (numbers, bools) and falls back to a
/// plain string. Intermediate objects are created as needed, and the result
/// must still deserialize into a [`Config`].
fn set_path(config: &Config, key: &str, value: &str) -> anyhow::Result<Config> {
    let mut json = serde_json::to_value(config)?;

    let parts: Vec<&str> = key.split('.').collect();
    let mut current = &mut json;
    for (i, part) in parts.iter().enumerate() {
        if i == parts.len() - 1 {
            let parsed: serde_json::Value = serde_json::from_str(value)
                .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
            current[part] = parsed;
        } else {
            if !current.get(part).map_or(false, |v| v.is_object()) {
                current[part] = serde_json::json!({});
            }
            current = &mut current[part];
        }
    }

    serde_json::from_value(json)
        .map_err(|e| anyhow::anyhow!("Invalid configuration after set: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use passcache_core::config::LogLevel;
    use tempfile::TempDir;

    #[test]
    fn test_dot_path_get() {
        let config = Config::default();
        let json = serde_json::to_value(&config).unwrap();

        let value = get_path(&json, "cache.encrypt");
        assert_eq!(value, Some(&serde_json::json!(true)));

        assert!(get_path(&json, "cache.nope").is_none());
        // Unset optional paths are omitted from the serialized form.
        assert!(get_path(&json, "source.path").is_none());
    }

    #[test]
    fn test_dot_path_set() {
        let updated = set_path(&Config::default(), "cache.encrypt", "false").unwrap();
        assert!(!updated.cache.encrypt);

        let updated = set_path(&updated, "source.path", "~/export.csv").unwrap();
        assert_eq!(updated.source.path.as_deref(), Some("~/export.csv"));
    }

    #[test]
    fn test_set_log_level() {
        let updated = set_path(&Config::default(), "logging.level", "debug").unwrap();
        assert_eq!(updated.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_invalid_set_returns_error() {
        // `cache` must stay an object.
        assert!(set_path(&Config::default(), "cache", "not-an-object").is_err());
        assert!(set_path(&Config::default(), "logging.level", "loud").is_err());
    }

    #[tokio::test]
    async fn test_init_then_set_source() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("passcache.json5");
        let export = tmp.path().join("export.csv");
        std::fs::write(&export, "name,password\nA,x\n").unwrap();

        let init = ConfigArgs {
            command: ConfigCommand::Init { force: false },
        };
        run(init, &config_path).await.unwrap();
        assert!(config_path.exists());

        let again = ConfigArgs {
            command: ConfigCommand::Init { force: false },
        };
        assert!(run(again, &config_path).await.is_err());

        let set = ConfigArgs {
            command: ConfigCommand::SetSource {
                path: export.display().to_string(),
            },
        };
        run(set, &config_path).await.unwrap();

        let saved = Config::load(&config_path).unwrap();
        assert_eq!(saved.source.path, Some(export.display().to_string()));
    }

    #[tokio::test]
    async fn test_validate_missing_file_fails() {
        let tmp = TempDir::new().unwrap();
        let args = ConfigArgs {
            command: ConfigCommand::Validate,
        };
        assert!(run(args, &tmp.path().join("absent.json5")).await.is_err());
    }
}
