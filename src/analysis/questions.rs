// Unanswered-question detection over an ordered message stream.
//
// A question counts as answered when someone else replies within the window
// with a link, a resolution-flavored word, or enough token overlap with the
// question itself. Crude, but catches the "asked into the void" messages a
// community manager actually wants surfaced.

use std::collections::HashSet;

use super::tokenize::Tokenizer;
use crate::sources::messages::Message;

/// Words that usually mark a reply as an attempted answer. Matched on a plain
/// lowercase word split, not on tokenizer output: several of these double as
/// stop words and must still match here.
const RESOLUTION_WORDS: &[&str] = &[
    "try", "use", "run", "update", "fix", "works", "resolved", "solution", "guide", "docs",
];

pub struct QuestionParams {
    /// How many messages after a question are inspected for answers.
    pub window: usize,
    /// Question/reply tokens at least this long count toward overlap.
    pub significant_token_len: usize,
    /// Overlapping tokens needed before a reply counts as an answer.
    pub min_shared_tokens: usize,
    /// Only the question's first N significant tokens participate.
    pub question_token_limit: usize,
}

impl Default for QuestionParams {
    fn default() -> Self {
        Self {
            window: 10,
            significant_token_len: 4,
            min_shared_tokens: 2,
            question_token_limit: 8,
        }
    }
}

/// Returns the messages whose questions nobody answered, in input order.
///
/// A question near the end of the stream is checked against however many
/// messages remain; a short tail never errors.
pub fn unanswered_messages<'a>(
    messages: &'a [Message],
    tokenizer: &Tokenizer,
    params: &QuestionParams,
) -> Vec<&'a Message> {
    let mut unanswered = Vec::new();

    for (i, message) in messages.iter().enumerate() {
        if !message.text.contains('?') {
            continue;
        }

        let mut question_tokens =
            tokenizer.significant_tokens(&message.text, params.significant_token_len);
        question_tokens.truncate(params.question_token_limit);
        question_tokens.sort();
        question_tokens.dedup();

        let answered = messages[i + 1..]
            .iter()
            .take(params.window)
            .any(|reply| is_answer(message, &question_tokens, reply, tokenizer, params));

        if !answered {
            unanswered.push(message);
        }
    }

    unanswered
}

/// Returns just the unanswered question texts.
pub fn find_unanswered(
    messages: &[Message],
    tokenizer: &Tokenizer,
    params: &QuestionParams,
) -> Vec<String> {
    unanswered_messages(messages, tokenizer, params)
        .into_iter()
        .map(|m| m.text.clone())
        .collect()
}

fn is_answer(
    question: &Message,
    question_tokens: &[String],
    reply: &Message,
    tokenizer: &Tokenizer,
    params: &QuestionParams,
) -> bool {
    if reply.author_id == question.author_id {
        return false;
    }

    if tokenizer.contains_url(&reply.text) {
        return true;
    }

    let reply_lower = reply.text.to_lowercase();
    if reply_lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| RESOLUTION_WORDS.contains(&word))
    {
        return true;
    }

    let reply_tokens: HashSet<String> = tokenizer
        .significant_tokens(&reply.text, params.significant_token_len)
        .into_iter()
        .collect();
    let shared = question_tokens
        .iter()
        .filter(|t| reply_tokens.contains(t.as_str()))
        .count();
    shared >= params.min_shared_tokens
}
