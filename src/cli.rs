use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;

use crate::config::Config;
use crate::database::Database;
use crate::error::CatalogError;
use crate::logging;
use crate::schema;

#[derive(Parser)]
#[command(
    name = "catalog",
    version,
    about = "Catalog: JSON API over a products table"
)]
pub struct Cli {
    /// Settings file to load instead of the profile-selected one
    #[arg(long = "config", short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the server (default if no command specified)
    Serve,

    /// Apply or revert schema migrations
    Migrate {
        #[command(subcommand)]
        direction: MigrateDirection,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum MigrateDirection {
    /// Apply all pending migrations
    Up,
    /// Revert the most recent migration
    Down,
}

impl Cli {
    pub fn handle_command_line() -> Result<(), CatalogError> {
        let args = Cli::parse();

        let config = Config::install(Config::load(args.config.as_deref())?);
        let _logger = logging::setup_logging(&config.logging)?;

        // Default to Serve if no command specified
        match args.command.unwrap_or(Command::Serve) {
            Command::Serve => Self::start_server(config),
            Command::Migrate { direction } => Self::migrate(config, direction),
        }
    }

    fn start_server(config: &Config) -> Result<(), CatalogError> {
        let db = Database::open(&config.database.path, config.database.pool_size)?;
        db.ensure_schema()?;
        info!("Database schema version {}", db.schema_version()?);

        info!(
            "Starting server on {}:{}",
            config.server.host, config.server.port
        );

        let rt = tokio::runtime::Runtime::new()
            .map_err(|e| CatalogError::Error(format!("Failed to create runtime: {}", e)))?;

        rt.block_on(async {
            let web_server = crate::server::WebServer::new(
                config.server.host.clone(),
                config.server.port,
                config.server.client_origin.clone(),
            );
            web_server.start(db).await
        })
    }

    fn migrate(config: &Config, direction: MigrateDirection) -> Result<(), CatalogError> {
        let db = Database::open(&config.database.path, 1)?;
        let conn = db.get_connection()?;

        match direction {
            MigrateDirection::Up => {
                let version = schema::up(&conn)?;
                println!("Database schema is at version {}", version);
            }
            MigrateDirection::Down => match schema::down(&conn)? {
                Some(version) => println!("Reverted migration {}", version),
                None => println!("No migrations to revert"),
            },
        }

        drop(conn);
        db.close();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parsing_no_command_defaults_to_serve() {
        let result = Cli::try_parse_from(["catalog"]);
        assert!(result.is_ok(), "Should accept no command");

        let cli = result.unwrap();
        assert!(cli.command.is_none());
        assert!(matches!(cli.command.unwrap_or(Command::Serve), Command::Serve));
    }

    #[test]
    fn test_cli_parsing_explicit_serve_command() {
        let cli = Cli::try_parse_from(["catalog", "serve"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Serve)));
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_parsing_migrate_directions() {
        let cli = Cli::try_parse_from(["catalog", "migrate", "up"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Migrate { direction: MigrateDirection::Up })
        ));

        let cli = Cli::try_parse_from(["catalog", "migrate", "down"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Migrate { direction: MigrateDirection::Down })
        ));

        assert!(Cli::try_parse_from(["catalog", "migrate"]).is_err());
    }

    #[test]
    fn test_cli_parsing_config_flag() {
        let cli = Cli::try_parse_from(["catalog", "serve", "--config", "settings.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("settings.toml")));
    }

    #[test]
    fn test_cli_parsing_invalid_arguments() {
        let result = Cli::try_parse_from(["catalog", "nonexistent-command"]);
        assert!(result.is_err(), "Should reject unknown commands");

        let result = Cli::try_parse_from(["catalog", "serve", "--invalid-flag"]);
        assert!(result.is_err(), "Should reject unknown flags on serve");
    }
}
