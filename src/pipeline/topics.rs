// Topic pipeline: build an index from a channel's messages and cache it
// so `examples` and `report` can reuse it without re-clustering.

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::info;

use crate::analysis::index::{build_topic_index, IndexParams, TopicIndex};
use crate::analysis::tokenize::Tokenizer;
use crate::db::queries::{cache_get, cache_put};
use crate::sources::messages::Message;

pub fn cache_key(channel: &str) -> String {
    format!("topics:{channel}")
}

/// Builds the topic index for `channel` and caches the result. Cached
/// indexes never expire; a rerun overwrites them.
pub fn run(
    conn: &Connection,
    channel: &str,
    messages: &[Message],
    tokenizer: &Tokenizer,
    params: &IndexParams,
) -> Result<TopicIndex> {
    let index = build_topic_index(messages, tokenizer, params);
    info!(
        channel,
        topics = index.topics.len(),
        messages = index.message_count,
        "Built topic index"
    );
    cache_put(
        conn,
        &cache_key(channel),
        &serde_json::to_string(&index)?,
        None,
    )?;
    Ok(index)
}

/// Returns the cached index from an earlier run, if one exists.
pub fn load_cached(conn: &Connection, channel: &str) -> Result<Option<TopicIndex>> {
    let key = cache_key(channel);
    match cache_get(conn, &key)? {
        Some(raw) => {
            let index = serde_json::from_str(&raw)
                .with_context(|| format!("Corrupt cached topic index under '{key}'"))?;
            Ok(Some(index))
        }
        None => Ok(None),
    }
}
