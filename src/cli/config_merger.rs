//! Configuration merger for CLI arguments and config files
//!
//! Precedence, lowest to highest: config files, `COLLEGE_*` environment
//! variables, global flags, then subcommand flags.

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, settings::Settings};

/// Applies CLI argument overrides to file-based configuration
pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Loads the base configuration honoring `--config` and `--env`.
    ///
    /// # Errors
    /// Returns ConfigError if configuration loading or validation fails
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut loader = ConfigLoader::new()?;

        if let Some(env) = cli.env {
            loader = loader.with_environment(env.into());
        }
        if let Some(path) = &cli.config {
            loader = loader.with_config_file(path);
        }

        Ok(Self::new(loader.load()?))
    }

    /// Returns a copy of the base configuration with CLI overrides applied
    /// and validated.
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        if let Some(Commands::Serve {
            host,
            port,
            log_level,
            ..
        }) = &cli.command
        {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
            // Subcommand level wins over --verbose/--quiet
            if let Some(level) = log_level {
                config.logger.level = (*level).into();
            }
        }

        config.validate()?;

        Ok(config)
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn merge(args: &[&str]) -> Settings {
        let cli = Cli::try_parse_from(args).unwrap();
        ConfigurationMerger::new(Settings::default())
            .merge_cli_args(&cli)
            .unwrap()
    }

    #[test]
    fn test_config_accessor() {
        let merger = ConfigurationMerger::new(Settings::default());
        assert_eq!(merger.config(), &Settings::default());
    }

    #[test]
    fn test_verbose_and_quiet_flags() {
        assert_eq!(merge(&["college-rs", "--verbose"]).logger.level, "debug");
        assert_eq!(merge(&["college-rs", "--quiet"]).logger.level, "error");
    }

    #[test]
    fn test_serve_overrides() {
        let merged = merge(&["college-rs", "serve", "--host", "0.0.0.0", "--port", "8080"]);
        assert_eq!(merged.server.host, "0.0.0.0");
        assert_eq!(merged.server.port, 8080);
    }

    #[test]
    fn test_command_log_level_overrides_global() {
        let merged = merge(&["college-rs", "--verbose", "serve", "--log-level", "warn"]);
        assert_eq!(merged.logger.level, "warn");
    }

    #[test]
    fn test_migrate_leaves_server_untouched() {
        let merged = merge(&["college-rs", "migrate"]);
        assert_eq!(merged.server, Settings::default().server);
    }

    #[test]
    fn test_invalid_merged_settings_are_rejected() {
        let mut base = Settings::default();
        base.logger.console.enabled = false;
        base.logger.file.enabled = false;

        let cli = Cli::try_parse_from(["college-rs"]).unwrap();
        assert!(matches!(
            ConfigurationMerger::new(base).merge_cli_args(&cli),
            Err(ConfigError::ValidationError { .. })
        ));
    }
}
