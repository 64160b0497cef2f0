// Channel activity statistics — who talks, and when.

use std::collections::HashMap;

use chrono::Datelike;
use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::sources::messages::Message;

const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Aggregate activity for one channel snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelStats {
    pub message_count: usize,
    /// (display name, message count), busiest first.
    pub contributors: Vec<(String, usize)>,
    /// Messages per weekday, Monday first. Undated messages are skipped.
    pub weekday_counts: [usize; 7],
}

pub fn compute_stats(messages: &[Message]) -> ChannelStats {
    let mut by_author: HashMap<&str, usize> = HashMap::new();
    let mut weekday_counts = [0usize; 7];

    for message in messages {
        *by_author.entry(message.display_name()).or_insert(0) += 1;
        if let Some(ts) = message.parsed_timestamp() {
            weekday_counts[ts.weekday().num_days_from_monday() as usize] += 1;
        }
    }

    let mut contributors: Vec<(String, usize)> = by_author
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    contributors.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    ChannelStats {
        message_count: messages.len(),
        contributors,
        weekday_counts,
    }
}

impl ChannelStats {
    /// Display activity stats in the terminal: top contributors, then a
    /// per-weekday bar chart.
    pub fn display(&self, channel: &str) {
        println!(
            "\n{}",
            format!("=== #{channel} ({} messages) ===", self.message_count).bold()
        );
        println!();

        println!("  {}", "Top contributors".bold());
        for (name, count) in self.contributors.iter().take(10) {
            println!("  {:<24} {}", name, count);
        }
        println!();

        println!("  {}", "Activity by weekday".bold());
        let bar_width: usize = 20;
        let busiest = self.weekday_counts.iter().copied().max().unwrap_or(0);
        for (label, &count) in WEEKDAY_LABELS.iter().zip(&self.weekday_counts) {
            let filled = if busiest > 0 {
                (count as f64 / busiest as f64 * bar_width as f64).round() as usize
            } else {
                0
            };
            let empty = bar_width.saturating_sub(filled);
            let bar = format!("[{}{}]", "=".repeat(filled), " ".repeat(empty));
            println!("  {} {} {}", label, bar.bright_blue(), count);
        }
        println!();
    }
}
