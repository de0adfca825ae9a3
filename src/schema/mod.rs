mod v0_to_v1;

use log::info;
use rusqlite::{Connection, OptionalExtension};

use crate::error::CatalogError;

use v0_to_v1::{DOWNGRADE_1_TO_0_SQL, UPGRADE_0_TO_1_SQL};

const CREATE_META_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// A reversible schema step. Applying `up_sql` moves the store from
/// `version - 1` to `version`; `down_sql` moves it back.
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub up_sql: &'static str,
    pub down_sql: &'static str,
}

impl Migration {
    pub const fn new(
        version: u32,
        name: &'static str,
        up_sql: &'static str,
        down_sql: &'static str,
    ) -> Self {
        Self {
            version,
            name,
            up_sql,
            down_sql,
        }
    }
}

// Ordered by version, no gaps.
pub const MIGRATIONS: &[Migration] = &[Migration::new(
    1,
    "create-products",
    UPGRADE_0_TO_1_SQL,
    DOWNGRADE_1_TO_0_SQL,
)];

pub const LATEST_VERSION: u32 = MIGRATIONS.len() as u32;

/// Schema version recorded in the `meta` table; 0 for an empty store.
pub fn current_version(conn: &Connection) -> Result<u32, CatalogError> {
    let meta_exists: bool = conn.query_row(
        "SELECT count(*) FROM sqlite_master WHERE type='table' AND name='meta'",
        [],
        |row| row.get::<_, i64>(0).map(|count| count > 0),
    )?;

    if !meta_exists {
        return Ok(0);
    }

    let stored_version: Option<String> = conn
        .query_row(
            "SELECT value FROM meta WHERE key = 'schema_version'",
            [],
            |row| row.get(0),
        )
        .optional()?;

    match stored_version {
        None => Ok(0),
        Some(version) => version.parse().map_err(|_| {
            CatalogError::Error(format!("Schema version '{version}' is not a number"))
        }),
    }
}

/// Applies every migration newer than the stored version, each in its own
/// transaction. Returns the resulting version.
pub fn up(conn: &Connection) -> Result<u32, CatalogError> {
    conn.execute_batch(CREATE_META_SQL)?;

    let current = current_version(conn)?;
    if current > LATEST_VERSION {
        return Err(CatalogError::Error(format!(
            "Database schema version {current} is newer than this build supports ({LATEST_VERSION})"
        )));
    }

    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(migration.up_sql)?;
        set_version(&tx, migration.version)?;
        tx.commit()?;

        info!(
            "Applied migration {} ({})",
            migration.version, migration.name
        );
    }

    Ok(LATEST_VERSION)
}

/// Reverts the most recently applied migration. Returns the version that was
/// reverted, or `None` when nothing is applied.
pub fn down(conn: &Connection) -> Result<Option<u32>, CatalogError> {
    let current = current_version(conn)?;
    if current == 0 {
        return Ok(None);
    }

    let migration = MIGRATIONS
        .iter()
        .find(|m| m.version == current)
        .ok_or_else(|| {
            CatalogError::Error(format!("No migration found for schema version {current}"))
        })?;

    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(migration.down_sql)?;
    set_version(&tx, current - 1)?;
    tx.commit()?;

    info!(
        "Reverted migration {} ({})",
        migration.version, migration.name
    );

    Ok(Some(current))
}

fn set_version(conn: &Connection, version: u32) -> Result<(), CatalogError> {
    conn.execute(
        "INSERT OR REPLACE INTO meta (key, value) VALUES ('schema_version', ?1)",
        [version.to_string()],
    )?;
    Ok(())
}
