//! Versioned migration runner and schema-version ledger.
//!
//! Units are applied one at a time in ascending version order; each success
//! appends exactly one ledger row before the next unit starts. Nothing wraps
//! the run in a transaction: a unit that fails is left as-is and retried on
//! the next launch, which is why every unit must be idempotent.

use crate::database::Database;
use crate::error::{is_missing_table, StorageResult};
use crate::schema::builtin_migrations;
use organizer_types::now_millis;
use rusqlite::{params, Connection};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// One versioned, idempotent schema change.
#[derive(Clone, Copy)]
pub struct Migration {
    /// Strictly increasing, starting at 1.
    pub version: u32,
    pub description: &'static str,
    pub up: fn(&Connection) -> rusqlite::Result<()>,
}

impl std::fmt::Debug for Migration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Migration")
            .field("version", &self.version)
            .field("description", &self.description)
            .finish()
    }
}

/// A row of the `migrations` ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaVersion {
    pub sequence: u32,
    pub applied_at: i64,
}

/// What a successful run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// The ledger already matched the latest unit; nothing ran.
    UpToDate { version: u32 },
    /// Units `from + 1 ..= to` were applied.
    Applied { from: u32, to: u32 },
}

/// Failures surfaced to startup code.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// A newer build has migrated this store. No unit is executed.
    #[error("schema version {recorded} is ahead of the latest known migration {latest}")]
    VersionSkew { recorded: u32, latest: u32 },

    /// Unit `version` failed; the ledger still ends at `version - 1`.
    #[error("migration {version} ({description}) failed: {source}")]
    UnitFailed {
        version: u32,
        description: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("migration ledger error: {0}")]
    Ledger(#[source] rusqlite::Error),

    #[error("invalid migration registry: {0}")]
    InvalidRegistry(String),
}

/// Ordered registry of units plus the logic to apply them.
#[derive(Debug, Clone)]
pub struct MigrationRunner {
    units: Vec<Migration>,
}

impl MigrationRunner {
    /// Build a runner over `units`, which must be numbered 1, 2, 3, ...
    pub fn new(units: Vec<Migration>) -> Result<Self, MigrationError> {
        for (index, unit) in units.iter().enumerate() {
            let expected = index as u32 + 1;
            if unit.version != expected {
                return Err(MigrationError::InvalidRegistry(format!(
                    "unit at position {index} has version {}, expected {expected}",
                    unit.version
                )));
            }
        }
        Ok(Self { units })
    }

    /// Runner over the units shipped with this build.
    pub fn builtin() -> Self {
        Self {
            units: builtin_migrations(),
        }
    }

    pub fn units(&self) -> &[Migration] {
        &self.units
    }

    /// Highest version this build knows about.
    pub fn latest_version(&self) -> u32 {
        self.units.last().map(|u| u.version).unwrap_or(0)
    }

    /// Highest applied version recorded in the ledger (0 for a fresh store).
    pub fn current_version(&self, db: &Database) -> Result<u32, MigrationError> {
        let conn = db.lock_conn();
        read_version(&conn).map_err(MigrationError::Ledger)
    }

    /// Bring the schema up to [`Self::latest_version`].
    pub fn migrate_to_latest(&self, db: &Database) -> Result<MigrationOutcome, MigrationError> {
        let conn = db.lock_conn();
        let recorded = read_version(&conn).map_err(MigrationError::Ledger)?;
        let latest = self.latest_version();

        if recorded == latest {
            debug!(version = recorded, "Schema up to date");
            return Ok(MigrationOutcome::UpToDate { version: recorded });
        }
        if recorded > latest {
            error!(recorded, latest, "Schema version skew, refusing to migrate");
            return Err(MigrationError::VersionSkew { recorded, latest });
        }

        for unit in self.units.iter().filter(|u| u.version > recorded) {
            info!(version = unit.version, description = unit.description, "Applying migration");
            if let Err(source) = (unit.up)(&conn) {
                error!(version = unit.version, error = %source, "Migration failed");
                return Err(MigrationError::UnitFailed {
                    version: unit.version,
                    description: unit.description,
                    source,
                });
            }
            record_version(&conn, unit.version).map_err(|e| {
                error!(version = unit.version, error = %e, "Failed to record migration");
                MigrationError::Ledger(e)
            })?;
        }

        info!(from = recorded, to = latest, "Schema migrated");
        Ok(MigrationOutcome::Applied {
            from: recorded,
            to: latest,
        })
    }
}

impl Default for MigrationRunner {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Current schema version, or 0 if the ledger cannot be read.
pub fn current_schema_version(db: &Database) -> u32 {
    let conn = db.lock_conn();
    read_version(&conn).unwrap_or_else(|e| {
        warn!(error = %e, "Could not read schema version");
        0
    })
}

/// Every ledger row in application order.
pub fn ledger_entries(db: &Database) -> StorageResult<Vec<SchemaVersion>> {
    let conn = db.lock_conn();
    let mut stmt = match conn.prepare("SELECT sequence, applied_at FROM migrations ORDER BY sequence") {
        Ok(stmt) => stmt,
        Err(e) if is_missing_table(&e) => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let rows = stmt
        .query_map([], |row| {
            Ok(SchemaVersion {
                sequence: row.get(0)?,
                applied_at: row.get(1)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

fn read_version(conn: &Connection) -> rusqlite::Result<u32> {
    match conn.query_row("SELECT COALESCE(MAX(sequence), 0) FROM migrations", [], |row| {
        row.get::<_, u32>(0)
    }) {
        Ok(version) => Ok(version),
        Err(e) if is_missing_table(&e) => Ok(0),
        Err(e) => Err(e),
    }
}

fn record_version(conn: &Connection, version: u32) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO migrations (sequence, applied_at) VALUES (?1, ?2)",
        params![version, now_millis()],
    )?;
    Ok(())
}
