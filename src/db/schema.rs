// SQLite schema management.
//
// All persistent state is one JSON key/value cache table. Schema changes are
// versioned: BASELINE creates the v1 layout, MIGRATIONS holds every later
// delta as plain SQL, applied in order and recorded in schema_version so
// reruns skip them.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Initial schema. The cache stores JSON payloads under prefixed keys:
///   messages:<channel>          message snapshot for a channel
///   topics:<channel>            topic index derived from the snapshot
///   questions:<channel>         unanswered-question list
///   stats:<channel>             activity statistics
///   stargazers:<owner>/<repo>   enriched stargazer list
///   prospects:<owner>/<repo>    ranked prospect list
const BASELINE: &str = "
    CREATE TABLE IF NOT EXISTS schema_version (
        version INTEGER PRIMARY KEY,
        applied_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS cache (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE INDEX IF NOT EXISTS idx_cache_updated ON cache(updated_at);
";

/// Versioned schema deltas, applied after the baseline.
/// v2: per-entry TTL. NULL means the entry never expires; fetched GitHub
/// data gets a finite TTL so stale snapshots refresh themselves.
const MIGRATIONS: &[(i64, &str)] = &[(2, "ALTER TABLE cache ADD COLUMN ttl_secs INTEGER;")];

/// Creates the schema and applies any pending migrations. Idempotent;
/// every command runs this on startup.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(BASELINE)
        .context("Failed to create cache tables")?;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (1)",
        [],
    )?;

    for &(version, sql) in MIGRATIONS {
        let applied: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM schema_version WHERE version = ?1)",
            [version],
            |row| row.get(0),
        )?;
        if applied {
            continue;
        }
        conn.execute_batch(sql)
            .with_context(|| format!("Schema migration v{version} failed"))?;
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [version],
        )?;
    }

    Ok(())
}

/// Number of user tables, for the `init` confirmation line.
pub fn table_count(conn: &Connection) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
        [],
        |row| row.get(0),
    )
    .context("Failed to inspect schema")
}
