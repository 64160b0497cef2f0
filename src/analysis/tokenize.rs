// Text normalization shared by every analysis stage.
//
// Tokenization has to stay deterministic and side-effect-free: topic indexes
// are cached and re-derived on demand, and identical input must produce
// identical topics, labels, and example rankings across runs.

use std::collections::HashSet;

use regex_lite::Regex;
use stop_words::{get, LANGUAGE};

/// Chat-specific noise on top of the standard English stop list.
///
/// The trailing short entries are the fragments left behind when contractions
/// split on the apostrophe ("don't" -> "don", "t").
const DOMAIN_STOP_WORDS: &[&str] = &[
    "discord", "github", "http", "https", "www", "lol", "lmao", "yeah", "yep",
    "okay", "hey", "guys", "thanks", "thx", "gonna", "wanna", "idk", "btw",
    "im", "dont", "thats", "cant", "don", "isn", "didn", "doesn", "s", "t",
    "m", "d", "re", "ve", "ll",
];

/// Lowercases, strips URLs, and splits chat text into topic-bearing tokens.
pub struct Tokenizer {
    stop_words: HashSet<String>,
    url_pattern: Regex,
}

impl Tokenizer {
    /// Builds a tokenizer from the standard English stop list plus `extra`
    /// domain-specific words.
    pub fn new(extra_stop_words: &[&str]) -> Self {
        let mut stop_words: HashSet<String> = get(LANGUAGE::English).into_iter().collect();
        stop_words.extend(extra_stop_words.iter().map(|w| w.to_string()));

        Self {
            stop_words,
            url_pattern: Regex::new(r"[a-z][a-z0-9+.-]*://\S+").unwrap(),
        }
    }

    /// Splits `text` into lowercase tokens with URLs and stop words removed.
    ///
    /// Splits on any run of characters that is not a letter, digit, `@`, or
    /// `#`, so user handles and channel references survive as single tokens.
    /// Empty input yields an empty vec.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let stripped = self.url_pattern.replace_all(&lower, " ");

        stripped
            .split(|c: char| !(c.is_alphanumeric() || c == '@' || c == '#'))
            .filter(|t| !t.is_empty() && !self.stop_words.contains(*t))
            .map(|t| t.to_string())
            .collect()
    }

    pub fn is_stop_word(&self, token: &str) -> bool {
        self.stop_words.contains(token)
    }

    /// Tokens of at least `min_len` characters, in text order. Short tokens
    /// carry too little signal for relevance or overlap matching.
    pub fn significant_tokens(&self, text: &str, min_len: usize) -> Vec<String> {
        self.tokenize(text)
            .into_iter()
            .filter(|t| t.chars().count() >= min_len)
            .collect()
    }

    /// True if `text` contains a `scheme://` style link.
    pub fn contains_url(&self, text: &str) -> bool {
        self.url_pattern.is_match(&text.to_lowercase())
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(DOMAIN_STOP_WORDS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_splits() {
        let tokenizer = Tokenizer::default();
        let tokens = tokenizer.tokenize("OAuth!! Redirect... MIGRATION");
        assert_eq!(tokens, vec!["oauth", "redirect", "migration"]);
    }

    #[test]
    fn test_tokenize_strips_urls() {
        let tokenizer = Tokenizer::default();
        let tokens = tokenizer.tokenize("docs live at https://example.com/guide?x=1 now");
        assert!(!tokens.iter().any(|t| t.contains("example")));
        assert!(tokens.contains(&"live".to_string()));
    }

    #[test]
    fn test_tokenize_keeps_handles_and_channels() {
        let tokenizer = Tokenizer::default();
        let tokens = tokenizer.tokenize("ping @maria in #support-channel");
        assert!(tokens.contains(&"@maria".to_string()));
        assert!(tokens.contains(&"#support".to_string()) || tokens.contains(&"#support-channel".to_string()));
    }

    #[test]
    fn test_tokenize_drops_stop_words() {
        let tokenizer = Tokenizer::default();
        let tokens = tokenizer.tokenize("the quick migration of the database");
        assert!(!tokens.contains(&"the".to_string()));
        assert!(tokens.contains(&"migration".to_string()));
        assert!(tokens.contains(&"database".to_string()));
    }

    #[test]
    fn test_tokenize_empty_input() {
        let tokenizer = Tokenizer::default();
        assert!(tokenizer.tokenize("").is_empty());
        assert!(tokenizer.tokenize("   \t\n").is_empty());
    }

    #[test]
    fn test_tokenize_idempotent_on_normalized_text() {
        let tokenizer = Tokenizer::default();
        let first = tokenizer.tokenize("Postgres migration failed after schema change");
        let rejoined = first.join(" ");
        assert_eq!(tokenizer.tokenize(&rejoined), first);
    }

    #[test]
    fn test_significant_tokens_filters_short() {
        let tokenizer = Tokenizer::default();
        let tokens = tokenizer.significant_tokens("fix the api rate limit bug", 4);
        assert!(tokens.contains(&"rate".to_string()));
        assert!(tokens.contains(&"limit".to_string()));
        assert!(!tokens.contains(&"api".to_string()));
    }

    #[test]
    fn test_contains_url() {
        let tokenizer = Tokenizer::default();
        assert!(tokenizer.contains_url("see HTTPS://docs.rs/serde"));
        assert!(!tokenizer.contains_url("no links here"));
    }
}
