// Topic index construction — the full tokenize/weigh/cluster/label pipeline.

use colored::Colorize;
use serde::{Deserialize, Serialize};

use super::cluster::{cluster, KMeansParams};
use super::label::{label_cluster, LabelParams};
use super::tfidf::{idf_map, weigh, WeightVector};
use super::tokenize::Tokenizer;
use crate::sources::messages::Message;

pub struct IndexParams {
    /// Number of clusters to form (clamped to the message count).
    pub clusters: usize,
    /// Keywords retained per topic.
    pub keywords_per_topic: usize,
    pub kmeans: KMeansParams,
    pub label: LabelParams,
}

impl Default for IndexParams {
    fn default() -> Self {
        Self {
            clusters: 6,
            keywords_per_topic: 5,
            kmeans: KMeansParams::default(),
            label: LabelParams::default(),
        }
    }
}

/// One discovered discussion topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub label: String,
    /// Highest-weight tokens across the topic's messages.
    pub keywords: Vec<String>,
    /// IDs of the member messages, in input order.
    pub message_ids: Vec<String>,
    pub size: usize,
}

/// Every topic found in one channel snapshot, largest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicIndex {
    pub topics: Vec<Topic>,
    pub message_count: usize,
}

/// Clusters `messages` into up to `params.clusters` labeled topics.
///
/// Clusters that end up with zero members simply produce no topic. Messages
/// whose text tokenizes to nothing still occupy a cluster slot but contribute
/// no weight anywhere.
pub fn build_topic_index(
    messages: &[Message],
    tokenizer: &Tokenizer,
    params: &IndexParams,
) -> TopicIndex {
    let documents: Vec<Vec<String>> = messages
        .iter()
        .map(|m| tokenizer.tokenize(&m.text))
        .collect();
    let vectors = weigh(&documents);
    let idf = idf_map(&documents);

    let assignments = cluster(&vectors, params.clusters, &params.kmeans);
    let k = assignments.iter().copied().max().map_or(0, |g| g + 1);

    let mut groups: Vec<Vec<usize>> = vec![Vec::new(); k];
    for (position, &group) in assignments.iter().enumerate() {
        groups[group].push(position);
    }

    let mut topics: Vec<Topic> = Vec::new();
    for (group_index, members) in groups.iter().enumerate() {
        if members.is_empty() {
            continue;
        }

        let member_documents: Vec<Vec<String>> =
            members.iter().map(|&i| documents[i].clone()).collect();
        let label = label_cluster(
            &member_documents,
            &idf,
            tokenizer,
            group_index,
            &params.label,
        );

        let member_vectors: Vec<&WeightVector> = members.iter().map(|&i| &vectors[i]).collect();
        let keywords = top_keywords(&member_vectors, params.keywords_per_topic);

        topics.push(Topic {
            label,
            keywords,
            message_ids: members
                .iter()
                .map(|&i| messages[i].message_id.clone())
                .collect(),
            size: members.len(),
        });
    }

    // Stable sort: equally sized topics keep cluster order.
    topics.sort_by(|a, b| b.size.cmp(&a.size));

    TopicIndex {
        topics,
        message_count: messages.len(),
    }
}

/// Tokens with the highest summed weight across the member vectors.
fn top_keywords(member_vectors: &[&WeightVector], limit: usize) -> Vec<String> {
    let mut sums = WeightVector::new();
    for vector in member_vectors {
        for (token, weight) in vector.iter() {
            *sums.entry(token.clone()).or_insert(0.0) += weight;
        }
    }

    let mut ranked: Vec<(String, f64)> = sums.into_iter().collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    ranked.into_iter().take(limit).map(|(token, _)| token).collect()
}

impl TopicIndex {
    /// Display the index as a formatted bar chart in the terminal, one row
    /// per topic, largest first. Bar length is the topic's share of the
    /// channel's messages.
    pub fn display(&self) {
        println!(
            "\n{}",
            format!(
                "=== Topic Index ({} topics across {} messages) ===",
                self.topics.len(),
                self.message_count
            )
            .bold()
        );
        println!();

        let bar_width: usize = 20;

        for (i, topic) in self.topics.iter().enumerate() {
            let share = if self.message_count > 0 {
                topic.size as f64 / self.message_count as f64
            } else {
                0.0
            };

            let filled = (share * bar_width as f64).round() as usize;
            let empty = bar_width.saturating_sub(filled);
            let bar = format!("[{}{}]", "=".repeat(filled.min(bar_width)), " ".repeat(empty));

            let colored_bar = if share >= 0.25 {
                bar.bright_green()
            } else if share >= 0.10 {
                bar.bright_yellow()
            } else {
                bar.bright_blue()
            };

            println!(
                "  {:>2}. {:<40} {} {} messages",
                i + 1,
                topic.label.bold(),
                colored_bar,
                topic.size
            );

            let keywords_str = topic.keywords.join(", ");
            println!("      Keywords: {}", keywords_str.dimmed());
            println!();
        }
    }
}
