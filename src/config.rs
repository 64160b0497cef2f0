use std::env;

use anyhow::Result;

/// Default cache lifetime for fetched data (one day).
pub const DEFAULT_CACHE_TTL_SECS: i64 = 86_400;

/// Default OpenAI-compatible chat-completions endpoint for the LLM ranker.
pub const DEFAULT_LLM_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Which prospect ranking backend to use.
#[derive(Debug, Clone, PartialEq)]
pub enum RankerBackend {
    /// Deterministic signal-based scoring (default) — no API key, no network
    Heuristic,
    /// LLM-based ranking — requires PROSPECTOR_LLM_API_KEY, falls back to
    /// the heuristic for candidates the model fails to score
    Llm,
}

/// Runtime configuration, read once at startup.
///
/// Every knob is an environment variable (dotenvy pulls in .env first),
/// so the binary itself carries no secrets.
pub struct Config {
    pub db_path: String,
    /// GitHub API token — optional; unauthenticated requests work but hit
    /// a much lower rate limit.
    pub github_token: Option<String>,
    /// Which prospect ranker to use (default: Heuristic)
    pub ranker_backend: RankerBackend,
    /// Chat-completions endpoint for the LLM ranker
    pub llm_url: String,
    pub llm_api_key: String,
    pub llm_model: String,
    /// How long fetched stargazer data stays fresh in the cache, in seconds
    pub cache_ttl_secs: i64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default except the LLM API key, which is only
    /// required when PROSPECTOR_RANKER=llm.
    pub fn load() -> Result<Self> {
        let ranker_backend = match env::var("PROSPECTOR_RANKER").as_deref() {
            Ok("llm") => RankerBackend::Llm,
            // "heuristic" or unset both default to the heuristic
            _ => RankerBackend::Heuristic,
        };

        let cache_ttl_secs = env::var("PROSPECTOR_CACHE_TTL")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_CACHE_TTL_SECS);

        Ok(Self {
            db_path: env::var("PROSPECTOR_DB_PATH")
                .unwrap_or_else(|_| "./prospector.db".to_string()),
            github_token: env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()),
            ranker_backend,
            llm_url: env::var("PROSPECTOR_LLM_URL").unwrap_or_else(|_| DEFAULT_LLM_URL.to_string()),
            llm_api_key: env::var("PROSPECTOR_LLM_API_KEY").unwrap_or_default(),
            llm_model: env::var("PROSPECTOR_LLM_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            cache_ttl_secs,
        })
    }

    /// Check that the LLM ranker is configured.
    /// Call this before any operation that explicitly requests LLM ranking.
    pub fn require_llm(&self) -> Result<()> {
        if self.llm_api_key.is_empty() {
            anyhow::bail!(
                "PROSPECTOR_LLM_API_KEY not set. Add it to your .env file,\n\
                 or unset PROSPECTOR_RANKER to use the heuristic scorer."
            );
        }
        Ok(())
    }
}
