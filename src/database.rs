use std::fs;
use std::path::Path;
use std::time::Duration;

use log::{debug, info};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;

use crate::error::CatalogError;
use crate::schema;

pub type DbConnection = PooledConnection<SqliteConnectionManager>;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the products store.
///
/// Cloning is cheap: clones share the same underlying pool. The pool is
/// opened explicitly at startup and released by [`Database::close`] (or when
/// the last clone is dropped).
#[derive(Clone)]
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    pub fn open(db_path: &Path, pool_size: u32) -> Result<Self, CatalogError> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                fs::create_dir_all(parent)?;
            }
        }

        let manager = SqliteConnectionManager::file(db_path)
            .with_init(|conn| conn.busy_timeout(BUSY_TIMEOUT));

        let pool = Pool::builder().max_size(pool_size.max(1)).build(manager)?;

        info!("Database opened at: {}", db_path.display());
        Ok(Database { pool })
    }

    /// A private in-memory store. Every SQLite `:memory:` connection is its
    /// own database, so the pool is capped at a single connection.
    pub fn open_in_memory() -> Result<Self, CatalogError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder().max_size(1).build(manager)?;

        debug!("In-memory database opened");
        Ok(Database { pool })
    }

    pub fn get_connection(&self) -> Result<DbConnection, CatalogError> {
        Ok(self.pool.get()?)
    }

    /// Applies any pending migrations.
    pub fn ensure_schema(&self) -> Result<(), CatalogError> {
        let conn = self.get_connection()?;
        let version = schema::up(&conn)?;
        debug!("Database schema at version {}", version);
        Ok(())
    }

    pub fn schema_version(&self) -> Result<u32, CatalogError> {
        let conn = self.get_connection()?;
        schema::current_version(&conn)
    }

    pub fn close(self) {
        let state = self.pool.state();
        debug!(
            "Closing database pool ({} connections, {} idle)",
            state.connections, state.idle_connections
        );
        drop(self.pool);
        info!("Database closed");
    }
}
