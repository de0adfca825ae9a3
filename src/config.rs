use std::env;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

pub static CONFIG: OnceCell<Config> = OnceCell::new();

/// Prefix for environment overrides. Sections are separated by `__`, e.g.
/// `CATALOG_SERVER__PORT=9000`.
pub const ENV_PREFIX: &str = "CATALOG_";

/// Selects the settings file: unset means `config.toml`, `test` means
/// `config.test.toml`, and so on.
pub const PROFILE_ENV_VAR: &str = "CATALOG_ENV";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    pub catalog: String,
}

impl LoggingConfig {
    const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];
    const CATALOG_LEVEL: &str = "info";

    fn default() -> Self {
        LoggingConfig {
            catalog: Self::CATALOG_LEVEL.to_string(),
        }
    }

    fn ensure_valid(&mut self) {
        let str_original = self.catalog.clone();
        self.catalog = self.catalog.trim().to_ascii_lowercase();
        if !Self::LOG_LEVELS.contains(&self.catalog.as_str()) {
            eprintln!(
                "Config error: catalog log level of '{}' is invalid - using default of '{}'",
                str_original,
                Self::CATALOG_LEVEL
            );
            self.catalog = Self::CATALOG_LEVEL.to_owned();
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origin allowed to make cross-origin requests. Unset allows any.
    pub client_origin: Option<String>,
}

impl ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            client_origin: None,
        }
    }

    fn ensure_valid(&mut self) {
        if let Some(origin) = &self.client_origin {
            let trimmed = origin.trim();
            self.client_origin = match trimmed.is_empty() {
                true => None,
                false => Some(trimmed.to_owned()),
            };
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub pool_size: u32,
}

impl DatabaseConfig {
    const DB_FILENAME: &str = "catalog.db";
    const POOL_SIZE: u32 = 8;

    fn default() -> Self {
        let path = ProjectDirs::from("", "", "catalog")
            .map(|dirs| dirs.data_local_dir().join(Self::DB_FILENAME))
            .unwrap_or_else(|| PathBuf::from(Self::DB_FILENAME));

        DatabaseConfig {
            path,
            pool_size: Self::POOL_SIZE,
        }
    }

    fn ensure_valid(&mut self) {
        if self.pool_size == 0 {
            eprintln!(
                "Config error: database pool_size of 0 is invalid - using default of '{}'",
                Self::POOL_SIZE
            );
            self.pool_size = Self::POOL_SIZE;
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Settings file name for a profile.
    pub fn config_file_name(profile: Option<&str>) -> String {
        match profile.map(str::trim) {
            None | Some("") => "config.toml".to_string(),
            Some(profile) => format!("config.{}.toml", profile.to_ascii_lowercase()),
        }
    }

    /// Builds the configuration from defaults, then the settings file, then
    /// `CATALOG_` environment variables.
    ///
    /// An explicitly requested file must exist. The profile-selected file is
    /// optional; without it only defaults and the environment apply.
    pub fn load(config_path: Option<&Path>) -> Result<Self, CatalogError> {
        let config_path = match config_path {
            Some(path) => {
                if !path.is_file() {
                    return Err(CatalogError::Error(format!(
                        "Config file '{}' does not exist",
                        path.display()
                    )));
                }
                path.to_owned()
            }
            None => {
                let profile = env::var(PROFILE_ENV_VAR).ok();
                PathBuf::from(Self::config_file_name(profile.as_deref()))
            }
        };

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let mut config: Config = figment.extract()?;
        config.ensure_valid();

        Ok(config)
    }

    /// Stores the configuration for the rest of the process. Only the first
    /// call has an effect.
    pub fn install(config: Config) -> &'static Config {
        CONFIG.get_or_init(|| config)
    }

    fn ensure_valid(&mut self) {
        self.server.ensure_valid();
        self.database.ensure_valid();
        self.logging.ensure_valid();
    }
}
