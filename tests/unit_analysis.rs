// Unit tests for the text-analysis stack.
//
// Exercises the public surface across module boundaries: tokenizer output
// feeding TF-IDF, clustering bounds on degenerate input, phrase labeling,
// and the invariants of an assembled topic index.

use prospector::analysis::cluster::{cluster, KMeansParams};
use prospector::analysis::index::{build_topic_index, IndexParams};
use prospector::analysis::label::{label_cluster, LabelParams};
use prospector::analysis::tfidf::{idf_map, weigh};
use prospector::analysis::tokenize::Tokenizer;
use prospector::sources::messages::Message;

fn message(id: &str, text: &str) -> Message {
    Message {
        message_id: id.to_string(),
        author: "tester".to_string(),
        author_id: "u1".to_string(),
        author_display_name: None,
        author_avatar_url: None,
        timestamp: None,
        text: text.to_string(),
        attachments: Vec::new(),
    }
}

// ============================================================
// Tokenizer -> TF-IDF handoff
// ============================================================

#[test]
fn tokenizer_strips_urls_before_weighting() {
    let tokenizer = Tokenizer::default();
    let tokens = tokenizer.tokenize("Check https://docs.example.com/guide?q=1 for the OAuth setup!!");

    assert!(tokens.contains(&"oauth".to_string()));
    assert!(
        !tokens.iter().any(|t| t.contains("example")),
        "URL fragments leaked into tokens: {tokens:?}"
    );
}

#[test]
fn weights_cover_exactly_the_tokenized_vocabulary() {
    let tokenizer = Tokenizer::default();
    let texts = [
        "postgres migration failed on the schema step",
        "oauth redirect loops back to the login page",
        "deploy pipeline turned green after the rollback",
    ];
    let documents: Vec<Vec<String>> = texts.iter().map(|t| tokenizer.tokenize(t)).collect();
    let vectors = weigh(&documents);

    assert_eq!(vectors.len(), documents.len());
    for (doc, vector) in documents.iter().zip(&vectors) {
        for token in doc {
            let weight = vector.get(token).copied().unwrap_or(0.0);
            assert!(weight > 0.0, "token {token} missing from its vector");
        }
        assert!(vector.keys().all(|k| doc.contains(k)));
    }
}

#[test]
fn idf_ranks_rare_tokens_above_ubiquitous_ones() {
    let documents: Vec<Vec<String>> = vec![
        vec!["postgres".to_string(), "alpha".to_string()],
        vec!["postgres".to_string(), "beta".to_string()],
        vec!["postgres".to_string(), "gamma".to_string()],
    ];
    let idf = idf_map(&documents);

    let common = idf["postgres"];
    let rare = idf["alpha"];
    assert!(
        rare > common,
        "rare token idf {rare} should exceed common token idf {common}"
    );
    assert!(common > 0.0, "smoothed idf must stay positive");
}

// ============================================================
// Clustering on degenerate input
// ============================================================

#[test]
fn clustering_tolerates_empty_weight_vectors() {
    let documents: Vec<Vec<String>> = vec![
        Vec::new(),
        vec!["alpha".to_string(), "beta".to_string()],
        Vec::new(),
    ];
    let vectors = weigh(&documents);
    let assignments = cluster(&vectors, 2, &KMeansParams::default());

    assert_eq!(assignments.len(), 3);
    assert!(assignments.iter().all(|&g| g < 2));
}

// ============================================================
// Labeling
// ============================================================

#[test]
fn label_prefers_distinctive_recurring_phrase() {
    let members: Vec<Vec<String>> = vec![
        vec![
            "vector".to_string(),
            "search".to_string(),
            "latency".to_string(),
            "spikes".to_string(),
        ],
        vec![
            "vector".to_string(),
            "search".to_string(),
            "index".to_string(),
            "rebuild".to_string(),
        ],
    ];
    let idf = idf_map(&members);
    let tokenizer = Tokenizer::default();

    let label = label_cluster(&members, &idf, &tokenizer, 0, &LabelParams::default());
    assert_eq!(label, "Vector Search");
}

// ============================================================
// Assembled index invariants
// ============================================================

#[test]
fn index_partitions_every_message_exactly_once() {
    let messages = vec![
        message("1", "database migration stuck halfway through the schema"),
        message("2", "oauth redirect keeps bouncing back to login"),
        message("3", "database migration rolled back cleanly overnight"),
        message("4", "oauth redirect mismatch error on the custom domain"),
        message("5", "deploy pipeline flaked twice then went green"),
        message("6", "database migration needs a bigger maintenance window"),
    ];
    let index = build_topic_index(&messages, &Tokenizer::default(), &IndexParams::default());

    let mut seen: Vec<&str> = index
        .topics
        .iter()
        .flat_map(|t| t.message_ids.iter().map(String::as_str))
        .collect();
    seen.sort_unstable();
    assert_eq!(seen, vec!["1", "2", "3", "4", "5", "6"]);
    assert_eq!(index.message_count, 6);
}

#[test]
fn index_keywords_always_come_from_member_text() {
    let tokenizer = Tokenizer::default();
    let messages = vec![
        message("1", "database migration stuck halfway through the schema"),
        message("2", "oauth redirect keeps bouncing back to login"),
        message("3", "database migration rolled back cleanly overnight"),
        message("4", "oauth redirect mismatch error on the custom domain"),
    ];
    let index = build_topic_index(&messages, &tokenizer, &IndexParams::default());

    for topic in &index.topics {
        let member_tokens: Vec<String> = topic
            .message_ids
            .iter()
            .flat_map(|id| {
                let text = &messages
                    .iter()
                    .find(|m| &m.message_id == id)
                    .expect("member id must exist")
                    .text;
                tokenizer.tokenize(text)
            })
            .collect();
        for keyword in &topic.keywords {
            assert!(
                member_tokens.contains(keyword),
                "keyword {keyword} not found in members of {}",
                topic.label
            );
        }
    }
}

#[test]
fn messages_without_usable_tokens_collapse_to_synthetic_topic() {
    let messages = vec![message("1", "??? !!!"), message("2", "the of and")];
    let index = build_topic_index(&messages, &Tokenizer::default(), &IndexParams::default());

    assert_eq!(index.topics.len(), 1);
    assert_eq!(index.topics[0].label, "Cluster 1");
    assert!(index.topics[0].keywords.is_empty());
    assert_eq!(index.topics[0].size, 2);
}

#[test]
fn index_is_byte_for_byte_reproducible() {
    let messages = vec![
        message("1", "database migration stuck halfway through the schema"),
        message("2", "oauth redirect keeps bouncing back to login"),
        message("3", "database migration rolled back cleanly overnight"),
        message("4", "deploy pipeline flaked twice then went green"),
        message("5", "oauth redirect mismatch error on the custom domain"),
    ];
    let tokenizer = Tokenizer::default();
    let params = IndexParams {
        clusters: 3,
        ..IndexParams::default()
    };

    let first = serde_json::to_string(&build_topic_index(&messages, &tokenizer, &params)).unwrap();
    let second = serde_json::to_string(&build_topic_index(&messages, &tokenizer, &params)).unwrap();
    assert_eq!(first, second);
}
