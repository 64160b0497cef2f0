// LLM-backed prospect ranking over an OpenAI-compatible chat endpoint.
//
// The model sees one JSON line per stargazer and must reply with a JSON
// array of {login, score, reason}. Replies are parsed permissively (models
// love to wrap JSON in prose); anything that still fails to parse is an
// error, and the caller falls back to the heuristic scorer.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::traits::{ProspectRanker, ProspectScore};
use crate::config::Config;
use crate::sources::stargazers::Stargazer;

const SYSTEM_PROMPT: &str = "You rank GitHub stargazers as sales prospects for a developer tool. \
    Score each candidate 0-100 for how promising they are to contact, based on employer, seniority, \
    and organization size. Reply with ONLY a JSON array, one object per candidate: \
    [{\"login\": \"...\", \"score\": 0, \"reason\": \"...\"}]";

pub struct LlmRanker {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl LlmRanker {
    pub fn new(api_url: &str, api_key: &str, model: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent("prospector/0.1")
            .timeout(Duration::from_secs(120))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        config.require_llm()?;
        Self::new(&config.llm_url, &config.llm_api_key, &config.llm_model)
    }

    fn build_prompt(stargazers: &[Stargazer]) -> Result<String> {
        let mut prompt = String::from("Candidates:\n");
        for stargazer in stargazers {
            prompt.push_str(&serde_json::to_string(stargazer)?);
            prompt.push('\n');
        }
        Ok(prompt)
    }
}

#[async_trait]
impl ProspectRanker for LlmRanker {
    fn name(&self) -> &'static str {
        "llm"
    }

    async fn rank(&self, stargazers: &[Stargazer]) -> Result<HashMap<String, ProspectScore>> {
        if stargazers.is_empty() {
            return Ok(HashMap::new());
        }

        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: Self::build_prompt(stargazers)?,
                },
            ],
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .with_context(|| format!("POST {} failed", self.api_url))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("LLM endpoint returned {status}: {body}");
        }

        let completion: ChatResponse = response
            .json()
            .await
            .context("Failed to decode LLM response")?;
        let reply = completion
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .unwrap_or_default();

        let rankings = parse_rankings(reply)?;
        debug!(candidates = stargazers.len(), ranked = rankings.len(), "LLM ranking complete");

        Ok(rankings
            .into_iter()
            .map(|r| {
                let score = r.score.round().clamp(0.0, 100.0) as u32;
                (r.login, ProspectScore { score, reason: r.reason })
            })
            .collect())
    }
}

/// Parses the model's reply into ranking entries, clamping scores later.
fn parse_rankings(reply: &str) -> Result<Vec<LlmRanking>> {
    let json = extract_json_array(reply)
        .with_context(|| format!("No JSON array in LLM reply: {}", reply.chars().take(200).collect::<String>()))?;
    serde_json::from_str(json).context("LLM reply was not a valid ranking array")
}

/// Slices out the first `[` through the last `]`, tolerating prose or code
/// fences around the array.
fn extract_json_array(reply: &str) -> Option<&str> {
    let start = reply.find('[')?;
    let end = reply.rfind(']')?;
    if end < start {
        return None;
    }
    Some(&reply[start..=end])
}

// ---- Chat completion wire types ----

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Deserialize)]
struct LlmRanking {
    login: String,
    score: f64,
    #[serde(default)]
    reason: String,
}
