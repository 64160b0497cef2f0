// System status display — shows DB stats, cache breakdown, freshest entry.

use anyhow::Result;
use std::path::Path;

use crate::db;
use crate::db::queries::{cache_entry_count, cache_prefix_counts, newest_entry, purge_expired};

/// Display system status to the terminal.
pub fn show(db_path: &str) -> Result<()> {
    if !Path::new(db_path).exists() {
        println!("Database: not initialized");
        println!("\nRun `prospector init` to set up the database.");
        return Ok(());
    }

    let conn = db::open(db_path)?;

    // Database file size
    let file_size = std::fs::metadata(db_path)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string());
    println!("Database: {} ({})", db_path, file_size);

    let expired = purge_expired(&conn)?;
    if expired > 0 {
        println!("Expired entries purged: {}", expired);
    }

    // Cache contents
    let total = cache_entry_count(&conn)?;
    if total == 0 {
        println!("Cache entries: none yet");
        println!("  Run `prospector topics --channel <name> --file <export.json>` to get started");
        return Ok(());
    }

    println!("Cache entries: {} total", total);
    for (prefix, count) in cache_prefix_counts(&conn)? {
        println!("  {}: {}", prefix, count);
    }

    if let Some((key, updated_at)) = newest_entry(&conn)? {
        println!("Newest entry: {} ({})", key, updated_at);
    }

    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    match bytes {
        b if b >= MB => format!("{:.1} MB", b as f64 / MB as f64),
        b if b >= KB => format!("{:.1} KB", b as f64 / KB as f64),
        b => format!("{b} B"),
    }
}
