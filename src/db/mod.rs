// SQLite connection management.
//
// rusqlite's "bundled" feature compiles SQLite in, so the binary has no
// system dependency. One connection per command invocation is plenty for a
// batch CLI; WAL keeps concurrent invocations from tripping over each other.
// The database file lives wherever PROSPECTOR_DB_PATH points (defaults to
// ./prospector.db).

pub mod models;
pub mod queries;
pub mod schema;

use std::path::Path;

use anyhow::{bail, Context, Result};
use rusqlite::Connection;

/// Creates the database (and its parent directory) if missing, then brings
/// the schema up to date. `prospector init` lands here.
pub fn initialize(db_path: &str) -> Result<Connection> {
    let parent = Path::new(db_path)
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty());
    if let Some(dir) = parent {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory for database: {db_path}"))?;
    }

    let conn = connect(db_path)?;
    schema::create_tables(&conn)?;
    Ok(conn)
}

/// Opens an existing database, refusing to create one implicitly.
pub fn open(db_path: &str) -> Result<Connection> {
    if !Path::new(db_path).exists() {
        bail!("Database not found at {db_path}. Run `prospector init` first.");
    }
    connect(db_path)
}

fn connect(db_path: &str) -> Result<Connection> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database at {db_path}"))?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    Ok(conn)
}
