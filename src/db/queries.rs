// Database queries — all cache access goes through this module.
//
// Keeping the SQL contained here gives the rest of the app clean Rust
// interfaces, and the TTL arithmetic lives in exactly one place.

use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};

/// Store a value under `key` (upsert). `ttl_secs = None` never expires.
pub fn cache_put(conn: &Connection, key: &str, value: &str, ttl_secs: Option<i64>) -> Result<()> {
    conn.execute(
        "INSERT INTO cache (key, value, ttl_secs, updated_at)
         VALUES (?1, ?2, ?3, datetime('now'))
         ON CONFLICT(key) DO UPDATE SET
            value = ?2,
            ttl_secs = ?3,
            updated_at = datetime('now')",
        params![key, value, ttl_secs],
    )?;
    Ok(())
}

/// Fetch a value by key, treating expired entries as absent.
pub fn cache_get(conn: &Connection, key: &str) -> Result<Option<String>> {
    let mut stmt = conn.prepare(
        "SELECT value FROM cache
         WHERE key = ?1
           AND (ttl_secs IS NULL
                OR datetime(updated_at, '+' || ttl_secs || ' seconds') > datetime('now'))",
    )?;
    let result = stmt.query_row(params![key], |row| row.get(0)).optional()?;
    Ok(result)
}

/// Delete entries whose TTL has lapsed. Returns how many were removed.
pub fn purge_expired(conn: &Connection) -> Result<usize> {
    let removed = conn.execute(
        "DELETE FROM cache
         WHERE ttl_secs IS NOT NULL
           AND datetime(updated_at, '+' || ttl_secs || ' seconds') <= datetime('now')",
        [],
    )?;
    Ok(removed)
}

/// Total number of cache entries, expired or not.
pub fn cache_entry_count(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM cache", [], |row| row.get(0))?;
    Ok(count)
}

/// Entry counts grouped by key prefix ("messages", "topics", ...).
pub fn cache_prefix_counts(conn: &Connection) -> Result<Vec<(String, i64)>> {
    let mut stmt = conn.prepare(
        "SELECT substr(key, 1, instr(key, ':') - 1) AS prefix, COUNT(*)
         FROM cache
         GROUP BY prefix
         ORDER BY prefix",
    )?;
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<rusqlite::Result<Vec<(String, i64)>>>()?;
    Ok(rows)
}

/// The most recently written cache entry, if any.
pub fn newest_entry(conn: &Connection) -> Result<Option<(String, String)>> {
    let mut stmt = conn.prepare(
        "SELECT key, updated_at FROM cache ORDER BY updated_at DESC, key LIMIT 1",
    )?;
    let result = stmt
        .query_row([], |row| Ok((row.get(0)?, row.get(1)?)))
        .optional()?;
    Ok(result)
}
