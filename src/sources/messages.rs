// Chat message ingest.
//
// Message exports come from external scraper tooling as a JSON array in which
// any field may be null. Everything is validated and defaulted here, at the
// boundary; analysis code never sees untyped or half-missing data.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::db::queries::{cache_get, cache_put};

/// One chat message from a channel export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, deserialize_with = "null_to_default")]
    pub message_id: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub author: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub author_id: String,
    #[serde(default)]
    pub author_display_name: Option<String>,
    #[serde(default)]
    pub author_avatar_url: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub text: String,
    /// Attachment URLs, if any.
    #[serde(default, deserialize_with = "null_to_default")]
    pub attachments: Vec<String>,
}

impl Message {
    /// Preferred display name: the profile display name when set, otherwise
    /// the bare username, otherwise the raw author id.
    pub fn display_name(&self) -> &str {
        if let Some(name) = self.author_display_name.as_deref().filter(|n| !n.is_empty()) {
            return name;
        }
        if !self.author.is_empty() {
            return &self.author;
        }
        &self.author_id
    }

    /// Parses the raw timestamp, accepting RFC 3339 or a bare naive datetime
    /// (treated as UTC). Returns None when absent or unparseable.
    pub fn parsed_timestamp(&self) -> Option<DateTime<FixedOffset>> {
        let raw = self.timestamp.as_deref()?;
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts);
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc().fixed_offset())
    }

    /// Sort key for "newest first" ordering. Messages without a parseable
    /// timestamp sort below all dated ones, by input position.
    pub fn recency_key(&self, position: usize) -> i64 {
        self.parsed_timestamp()
            .map(|ts| ts.timestamp_millis())
            .unwrap_or(i64::MIN + position as i64)
    }
}

pub fn cache_key(channel: &str) -> String {
    format!("messages:{channel}")
}

/// Reads and normalizes a message export file (a JSON array of messages).
pub fn read_export_file(path: &Path) -> Result<Vec<Message>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read message export {}", path.display()))?;
    let messages: Vec<Message> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse message export {}", path.display()))?;
    Ok(normalize(messages))
}

/// Loads messages for `channel`, trying the cache first and then the export
/// file. Imported exports are cached without expiry; a fresh export replaces
/// the snapshot wholesale.
pub fn load_messages(
    conn: &Connection,
    channel: &str,
    file: Option<&Path>,
    refresh: bool,
) -> Result<Vec<Message>> {
    let key = cache_key(channel);

    if !refresh {
        if let Some(raw) = cache_get(conn, &key)? {
            let messages: Vec<Message> = serde_json::from_str(&raw)
                .with_context(|| format!("Corrupt cached messages under '{key}'"))?;
            if !messages.is_empty() {
                debug!(channel, count = messages.len(), "Loaded messages from cache");
                return Ok(messages);
            }
        }
    }

    if let Some(path) = file {
        let messages = read_export_file(path)?;
        info!(
            channel,
            count = messages.len(),
            path = %path.display(),
            "Imported message export"
        );
        cache_put(conn, &key, &serde_json::to_string(&messages)?, None)?;
        return Ok(messages);
    }

    bail!("No cached messages for channel '{channel}'. Pass --file <export.json> to import them.")
}

/// Drops messages with no usable text and backfills missing IDs so every
/// surviving message can be referenced from a topic.
fn normalize(mut messages: Vec<Message>) -> Vec<Message> {
    messages.retain(|m| !m.text.trim().is_empty());
    for (position, message) in messages.iter_mut().enumerate() {
        if message.message_id.is_empty() {
            message.message_id = format!("msg-{position}");
        }
    }
    messages
}

fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let value = Option::<T>::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_export_with_nulls() {
        let raw = r#"[
            {
                "message_id": "111",
                "author": "maria",
                "author_id": "u1",
                "author_display_name": "Maria",
                "author_avatar_url": null,
                "timestamp": "2024-05-01T12:34:56.789000+00:00",
                "text": "hello world, this is a message",
                "attachments": ["https://cdn.example.com/a.png"]
            },
            {
                "message_id": null,
                "author": null,
                "author_id": null,
                "author_display_name": null,
                "author_avatar_url": null,
                "timestamp": null,
                "text": "second message with missing metadata",
                "attachments": []
            },
            {
                "message_id": "333",
                "author": "bot",
                "author_id": "u9",
                "author_display_name": null,
                "author_avatar_url": null,
                "timestamp": null,
                "text": "   ",
                "attachments": []
            }
        ]"#;

        let messages = normalize(serde_json::from_str(&raw).unwrap());

        // The whitespace-only message is dropped; the null ID is backfilled.
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].message_id, "111");
        assert_eq!(messages[1].message_id, "msg-1");
        assert_eq!(messages[1].author, "");
    }

    #[test]
    fn test_display_name_fallback() {
        let mut message = Message {
            message_id: "1".to_string(),
            author: "maria".to_string(),
            author_id: "u1".to_string(),
            author_display_name: Some("Maria G".to_string()),
            author_avatar_url: None,
            timestamp: None,
            text: "hi".to_string(),
            attachments: Vec::new(),
        };
        assert_eq!(message.display_name(), "Maria G");

        message.author_display_name = Some(String::new());
        assert_eq!(message.display_name(), "maria");

        message.author_display_name = None;
        assert_eq!(message.display_name(), "maria");

        message.author = String::new();
        assert_eq!(message.display_name(), "u1");
    }

    #[test]
    fn test_parsed_timestamp_formats() {
        let mut message = Message {
            message_id: "1".to_string(),
            author: String::new(),
            author_id: String::new(),
            author_display_name: None,
            author_avatar_url: None,
            timestamp: Some("2024-05-01T12:34:56.789000+00:00".to_string()),
            text: String::new(),
            attachments: Vec::new(),
        };
        assert!(message.parsed_timestamp().is_some());

        message.timestamp = Some("2024-05-01T12:34:56.789".to_string());
        assert!(message.parsed_timestamp().is_some());

        message.timestamp = Some("yesterday at noon".to_string());
        assert!(message.parsed_timestamp().is_none());

        message.timestamp = None;
        assert!(message.parsed_timestamp().is_none());
    }

    #[test]
    fn test_recency_key_ordering() {
        let dated = Message {
            message_id: "1".to_string(),
            author: String::new(),
            author_id: String::new(),
            author_display_name: None,
            author_avatar_url: None,
            timestamp: Some("2020-01-01T00:00:00+00:00".to_string()),
            text: String::new(),
            attachments: Vec::new(),
        };
        let undated = Message {
            timestamp: None,
            ..dated.clone()
        };

        // Any parseable timestamp outranks any unparseable one.
        assert!(dated.recency_key(0) > undated.recency_key(99));
        assert!(undated.recency_key(1) > undated.recency_key(0));
    }
}
