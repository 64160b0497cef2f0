// Unit tests for example retrieval and unanswered-question detection.
//
// Covers the quotability boundary, topic-member-driven ranking, and the
// answer heuristics (window, resolution words, token overlap) on realistic
// support-channel transcripts.

use prospector::analysis::questions::{find_unanswered, unanswered_messages, QuestionParams};
use prospector::analysis::retrieve::{examples_for_query, examples_for_topic, ExampleParams};
use prospector::analysis::tokenize::Tokenizer;
use prospector::sources::messages::Message;

fn message(id: &str, author_id: &str, text: &str) -> Message {
    Message {
        message_id: id.to_string(),
        author: author_id.to_string(),
        author_id: author_id.to_string(),
        author_display_name: None,
        author_avatar_url: None,
        timestamp: None,
        text: text.to_string(),
        attachments: Vec::new(),
    }
}

// ============================================================
// Quotability boundary
// ============================================================

#[test]
fn quote_length_boundary_sits_at_twenty_chars() {
    let nineteen = "a".repeat(19);
    let twenty = "b".repeat(20);
    let padded = format!("   {}   ", "a".repeat(19));
    let messages = vec![
        message("short", "u1", &nineteen),
        message("padded", "u2", &padded),
        message("long", "u3", &twenty),
    ];

    let results = examples_for_query(
        "zzz",
        &messages,
        &Tokenizer::default(),
        5,
        &ExampleParams::default(),
    );

    assert_eq!(results.len(), 1, "only the 20-char message is quotable");
    assert_eq!(results[0].message_id, "long");
}

// ============================================================
// Topic-member-driven ranking
// ============================================================

#[test]
fn topic_label_ranks_members_and_ignores_outsiders() {
    let messages = vec![
        message(
            "on-topic",
            "u1",
            "the oauth redirect mismatch is back on the custom domain",
        ),
        message(
            "partial",
            "u2",
            "my redirect chain finally settles after three hops",
        ),
        message("ack", "u3", "thanks so much!!!!!!!!"),
        message(
            "outsider",
            "u4",
            "oauth redirect rant from outside the member list",
        ),
    ];
    let member_ids = vec![
        "on-topic".to_string(),
        "partial".to_string(),
        "ack".to_string(),
    ];

    let results = examples_for_topic(
        "Oauth Redirect",
        &member_ids,
        &messages,
        &Tokenizer::default(),
        5,
        &ExampleParams::default(),
    );

    let ids: Vec<&str> = results.iter().map(|m| m.message_id.as_str()).collect();
    assert_eq!(
        ids,
        vec!["on-topic", "partial"],
        "phrase hit outranks single-token hit, ack and non-member excluded"
    );
}

#[test]
fn query_matching_is_case_insensitive() {
    let messages = vec![
        message(
            "exact",
            "u1",
            "the oauth redirect keeps looping after login",
        ),
        message(
            "token",
            "u2",
            "redirect rules rewrote themselves again last night",
        ),
    ];

    let results = examples_for_query(
        "OAuth Redirect",
        &messages,
        &Tokenizer::default(),
        2,
        &ExampleParams::default(),
    );

    assert_eq!(results[0].message_id, "exact");
    assert_eq!(results[1].message_id, "token");
}

// ============================================================
// Unanswered questions: realistic transcripts
// ============================================================

#[test]
fn mismatch_question_stays_unanswered_amid_chatter() {
    let question =
        "Has anyone managed to get the OAuth redirect working with a custom domain? I keep getting a mismatch error.";
    let messages = vec![
        message("q", "sarah", question),
        message("c1", "ben", "good morning folks"),
        message("c2", "mia", "anyone up for lunch later"),
        message("c3", "raj", "the standup moved to eleven"),
    ];

    let unanswered =
        find_unanswered(&messages, &Tokenizer::default(), &QuestionParams::default());
    assert_eq!(unanswered, vec![question.to_string()]);
}

#[test]
fn config_suggestion_counts_as_answer() {
    let messages = vec![
        message(
            "q",
            "sarah",
            "Has anyone managed to get the OAuth redirect working with a custom domain? I keep getting a mismatch error.",
        ),
        message(
            "a",
            "ben",
            "try setting the redirect_uri explicitly in your app config",
        ),
    ];

    let unanswered =
        find_unanswered(&messages, &Tokenizer::default(), &QuestionParams::default());
    assert!(unanswered.is_empty(), "got: {unanswered:?}");
}

#[test]
fn single_shared_token_does_not_answer_but_two_do() {
    let question = "is the kubernetes ingress broken after the upgrade?";
    let one_shared = vec![
        message("q", "a", question),
        message(
            "r",
            "b",
            "that ingress dashboard hides everything important honestly",
        ),
    ];
    let unanswered =
        find_unanswered(&one_shared, &Tokenizer::default(), &QuestionParams::default());
    assert_eq!(unanswered.len(), 1, "one shared token is not an answer");

    let two_shared = vec![
        message("q", "a", question),
        message(
            "r",
            "b",
            "the kubernetes ingress flaked during tonight's rollout",
        ),
    ];
    let unanswered =
        find_unanswered(&two_shared, &Tokenizer::default(), &QuestionParams::default());
    assert!(unanswered.is_empty(), "two shared tokens answer the question");
}

#[test]
fn window_override_controls_answer_horizon() {
    let messages = vec![
        message("q", "a", "did the deploy hit the staging cluster yet?"),
        message("n1", "b", "mhm"),
        message("n2", "c", "coffee first"),
        message(
            "ans",
            "d",
            "try redeploying, the staging cluster lagged behind",
        ),
    ];
    let tokenizer = Tokenizer::default();

    let narrow = QuestionParams {
        window: 2,
        ..QuestionParams::default()
    };
    assert_eq!(
        find_unanswered(&messages, &tokenizer, &narrow).len(),
        1,
        "answer sits outside a 2-message window"
    );

    let wide = QuestionParams {
        window: 3,
        ..QuestionParams::default()
    };
    assert!(find_unanswered(&messages, &tokenizer, &wide).is_empty());
}

#[test]
fn unanswered_refs_preserve_stream_order_and_authors() {
    let messages = vec![
        message("q1", "ana", "why is the billing export broken for the finance team?"),
        message("q2", "bo", "who owns the grafana alerts for the billing service now?"),
    ];

    let unanswered =
        unanswered_messages(&messages, &Tokenizer::default(), &QuestionParams::default());
    assert_eq!(unanswered.len(), 2);
    assert_eq!(unanswered[0].author_id, "ana");
    assert_eq!(unanswered[1].author_id, "bo");
}
