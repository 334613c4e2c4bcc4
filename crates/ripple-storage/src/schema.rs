//! Versioned in-code migrations.
//!
//! `schema_version` holds a single row; each migration runs inside a
//! transaction and bumps it. Never edit a shipped migration; append.

use rusqlite::Connection;

use crate::error::StorageError;

const MIGRATIONS: &[(u32, &str)] = &[(
    1,
    "CREATE TABLE decisions (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        kind        TEXT NOT NULL,
        target      TEXT NOT NULL,
        confidence  TEXT NOT NULL,
        summary     TEXT NOT NULL,
        result_json TEXT NOT NULL,
        created_at  TEXT NOT NULL
    );
    CREATE INDEX idx_decisions_created_at ON decisions(created_at);",
)];

pub(crate) fn apply_migrations(conn: &mut Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)",
        [],
    )?;
    let current: u32 = conn
        .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |row| {
            row.get(0)
        })?;

    for (version, sql) in MIGRATIONS {
        if *version <= current {
            continue;
        }
        let tx = conn.transaction()?;
        tx.execute_batch(sql)
            .map_err(|e| StorageError::MigrationFailed {
                version: *version,
                message: e.to_string(),
            })?;
        tx.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
        tx.commit()?;
        tracing::debug!(version = *version, "applied decision-log migration");
    }
    Ok(())
}
