// Cluster labeling via scored n-grams.
//
// Multi-word phrases make far better labels than single keywords, but only
// when they actually recur. Candidates are scored by occurrence count times
// mean idf (idf taken against the full collection, not the cluster), so a
// phrase distinctive to the corpus outranks a generic one repeated as often.

use std::cmp::Ordering;
use std::collections::HashMap;

use super::tokenize::Tokenizer;

pub struct LabelParams {
    /// Candidate phrase lengths, longest first.
    pub ngram_lengths: Vec<usize>,
    /// A phrase must recur this many times to qualify.
    pub min_occurrences: usize,
    /// Hard cap on words in the final label.
    pub max_label_words: usize,
    /// Single tokens used when no phrase qualifies.
    pub fallback_tokens: usize,
}

impl Default for LabelParams {
    fn default() -> Self {
        Self {
            ngram_lengths: vec![4, 3, 2],
            min_occurrences: 2,
            max_label_words: 4,
            fallback_tokens: 3,
        }
    }
}

/// Ranked candidate phrases for one cluster, best first.
///
/// Near-duplicates are suppressed: a candidate that contains, or is contained
/// by, an already-kept higher-scoring candidate is dropped.
pub fn top_phrases(
    members: &[Vec<String>],
    idf: &HashMap<String, f64>,
    tokenizer: &Tokenizer,
    params: &LabelParams,
) -> Vec<String> {
    let stream: Vec<&str> = members.iter().flatten().map(String::as_str).collect();

    let mut scored: Vec<(String, f64)> = Vec::new();
    for &len in &params.ngram_lengths {
        if len == 0 || stream.len() < len {
            continue;
        }
        let mut counts: HashMap<String, (usize, f64)> = HashMap::new();
        for window in stream.windows(len) {
            if window.iter().any(|t| tokenizer.is_stop_word(t)) {
                continue;
            }
            let mean_idf: f64 = window
                .iter()
                .map(|t| idf.get(*t).copied().unwrap_or(1.0))
                .sum::<f64>()
                / len as f64;
            let entry = counts.entry(window.join(" ")).or_insert((0, mean_idf));
            entry.0 += 1;
        }
        for (phrase, (count, mean_idf)) in counts {
            if count >= params.min_occurrences {
                scored.push((phrase, count as f64 * mean_idf));
            }
        }
    }

    // Ties prefer the longer phrase, then lexicographic order, so ranking
    // is reproducible and a recurring 4-gram beats its own sub-phrases.
    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| word_count(&b.0).cmp(&word_count(&a.0)))
            .then_with(|| a.0.cmp(&b.0))
    });

    let mut kept: Vec<String> = Vec::new();
    for (phrase, _) in scored {
        if kept
            .iter()
            .any(|k| k.contains(phrase.as_str()) || phrase.contains(k.as_str()))
        {
            continue;
        }
        kept.push(phrase);
    }
    kept
}

/// Labels one cluster, falling back to its most frequent single tokens and
/// then to a synthetic name when members carry no usable phrase at all.
pub fn label_cluster(
    members: &[Vec<String>],
    idf: &HashMap<String, f64>,
    tokenizer: &Tokenizer,
    cluster_index: usize,
    params: &LabelParams,
) -> String {
    let phrases = top_phrases(members, idf, tokenizer, params);
    if let Some(best) = phrases.first() {
        return title_case(best, params.max_label_words);
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for token in members.iter().flatten() {
        if !tokenizer.is_stop_word(token) {
            *counts.entry(token).or_insert(0) += 1;
        }
    }
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    if ranked.is_empty() {
        return format!("Cluster {}", cluster_index + 1);
    }

    let tokens: Vec<&str> = ranked
        .iter()
        .take(params.fallback_tokens)
        .map(|(token, _)| *token)
        .collect();
    title_case(&tokens.join(" "), params.max_label_words)
}

fn word_count(phrase: &str) -> usize {
    phrase.split(' ').count()
}

/// Title-cases up to `max_words` space-separated words.
pub fn title_case(phrase: &str, max_words: usize) -> String {
    phrase
        .split_whitespace()
        .take(max_words)
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
