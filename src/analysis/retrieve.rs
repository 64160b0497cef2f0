// Example selection — the most relevant quotable messages for a topic or an
// ad hoc query.
//
// Relevance is deliberately crude: substring hit on the whole needle plus one
// point per significant token present. When nothing scores, recency wins, so
// a topic with plausible members is never left without an example.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex_lite::Regex;

use super::tokenize::Tokenizer;
use crate::sources::messages::Message;

pub struct ExampleParams {
    /// Shortest text worth quoting.
    pub min_text_len: usize,
    /// Needle tokens at least this long count toward relevance.
    pub significant_token_len: usize,
}

impl Default for ExampleParams {
    fn default() -> Self {
        Self {
            min_text_len: 20,
            significant_token_len: 4,
        }
    }
}

/// Bare acknowledgements that are long enough to pass the length filter but
/// still say nothing ("thanks so much!!", "yes", "lol ok").
fn ack_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)^(ok(ay)?|kk?|thanks?( (you|so much|a lot))?|thank you|thx|ty|yes|yeah|yep|no|nope|lol|lmao|haha+|hm+|nice|cool|same|sure|done|great|wow|\+1)[\s[:punct:]]*$",
        )
        .unwrap()
    })
}

fn is_quotable(message: &Message, params: &ExampleParams) -> bool {
    let text = message.text.trim();
    text.chars().count() >= params.min_text_len && !ack_pattern().is_match(text)
}

/// Ranks `candidates` against `needle` and returns up to `limit` of them.
///
/// Score: +5 when the candidate contains the whole needle, +1 per distinct
/// significant needle token present. Ties break by recency, so an all-zero
/// round degrades to "most recent first" rather than an empty answer.
fn rank_examples<'a>(
    needle: &str,
    candidates: &[&'a Message],
    tokenizer: &Tokenizer,
    limit: usize,
    params: &ExampleParams,
) -> Vec<&'a Message> {
    let needle_lower = needle.to_lowercase();
    let mut significant = tokenizer.significant_tokens(needle, params.significant_token_len);
    significant.sort();
    significant.dedup();

    let mut scored: Vec<(u32, i64, &Message)> = candidates
        .iter()
        .enumerate()
        .filter(|(_, m)| is_quotable(m, params))
        .map(|(position, m)| {
            let text_lower = m.text.to_lowercase();
            let mut score = 0u32;
            if !needle_lower.is_empty() && text_lower.contains(&needle_lower) {
                score += 5;
            }
            for token in &significant {
                if text_lower.contains(token.as_str()) {
                    score += 1;
                }
            }
            (score, m.recency_key(position), *m)
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.cmp(&a.1)));
    scored.into_iter().take(limit).map(|(_, _, m)| m).collect()
}

/// Picks up to `limit` example messages for one topic, drawn from its members.
///
/// An empty member set yields an empty result; that is not an error.
pub fn examples_for_topic<'a>(
    topic_label: &str,
    member_message_ids: &[String],
    messages: &'a [Message],
    tokenizer: &Tokenizer,
    limit: usize,
    params: &ExampleParams,
) -> Vec<&'a Message> {
    let members: HashSet<&str> = member_message_ids.iter().map(String::as_str).collect();
    let candidates: Vec<&Message> = messages
        .iter()
        .filter(|m| members.contains(m.message_id.as_str()))
        .collect();
    rank_examples(topic_label, &candidates, tokenizer, limit, params)
}

/// Picks up to `limit` example messages for a free-text query, drawn from the
/// whole channel.
pub fn examples_for_query<'a>(
    query: &str,
    messages: &'a [Message],
    tokenizer: &Tokenizer,
    limit: usize,
    params: &ExampleParams,
) -> Vec<&'a Message> {
    let candidates: Vec<&Message> = messages.iter().collect();
    rank_examples(query, &candidates, tokenizer, limit, params)
}
