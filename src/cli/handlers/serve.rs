//! Serve command handler
//!
//! Handles the serve command including dry-run validation and server startup.

use crate::config::DatabaseBackend;
use crate::config::settings::Settings;
use crate::server::Server;

/// Handler for the serve command
pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Runs the server, or only validates and summarizes the configuration
    /// when `dry_run` is set.
    ///
    /// # Errors
    /// - Configuration validation errors
    /// - Server startup errors (if not dry-run)
    pub async fn execute(self, dry_run: bool) -> anyhow::Result<()> {
        if dry_run {
            return self.validate_only();
        }
        Server::new(self.config).run().await
    }

    /// Validate configuration without starting the server
    pub fn validate_only(&self) -> anyhow::Result<()> {
        self.config.validate()?;

        let database = &self.config.database;
        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", self.config.server.address());
        match database.backend {
            DatabaseBackend::Postgres => println!(
                "✓ PostgreSQL pool: {}..{} connections, auto-migrate {}",
                database.min_connections, database.max_connections, database.auto_migrate
            ),
            DatabaseBackend::Memory => println!("✓ In-memory store (data is not persisted)"),
        }
        println!(
            "✓ Teacher registry attempts: {}",
            self.config.registry.max_attempts
        );
        println!("Dry run completed successfully - configuration is ready for deployment");
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_handler_new() {
        let handler = ServeCommandHandler::new(Settings::default());
        assert_eq!(handler.config(), &Settings::default());
    }

    #[tokio::test]
    async fn test_serve_handler_dry_run() {
        let handler = ServeCommandHandler::new(Settings::default());
        assert!(handler.execute(true).await.is_ok());
    }

    #[tokio::test]
    async fn test_serve_handler_dry_run_invalid_config() {
        let mut config = Settings::default();
        config.server.port = 0;
        let handler = ServeCommandHandler::new(config);
        assert!(handler.execute(true).await.is_err());
    }
}
