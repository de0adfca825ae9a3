use rusqlite::Error as RusqliteError;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    #[error("Database error: {0}")]
    DatabaseError(#[from] RusqliteError),

    #[error("Connection pool error: {0}")]
    PoolError(#[from] r2d2::Error),

    #[error("Configuration error: {0}")]
    ConfigError(#[from] Box<figment::Error>),

    #[error("Invalid input: {0}")]
    InvalidInput(String), // Caller supplied a value we refuse to act on

    #[error("Error: {0}")]
    Error(String), // Allows custom application errors
}

impl From<figment::Error> for CatalogError {
    fn from(err: figment::Error) -> Self {
        CatalogError::ConfigError(Box::new(err))
    }
}
