// Deterministic prospect scoring from profile signals.
//
// Each signal is independent and additive, and each one appends its own
// fragment to the reason string. The rule set tops out at 50, well inside
// the 0-100 scale shared with the LLM ranker. No network, no model, no
// surprises: this is the fallback that always works.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use regex_lite::Regex;

use super::traits::{ProspectRanker, ProspectScore};
use crate::sources::stargazers::Stargazer;

/// Employers whose appearance in a company field is worth flagging.
const COMPANY_PATTERNS: &[&str] = &[
    "google", "microsoft", "amazon", "aws", "meta", "facebook", "apple", "netflix", "openai",
    "anthropic", "stripe", "shopify", "github", "gitlab", "vercel", "cloudflare", "databricks",
    "snowflake", "nvidia", "salesforce", "atlassian", "hashicorp", "datadog",
];

/// Seniority markers people put in their company field.
const TITLE_PATTERNS: &[&str] = &[
    "cto", "ceo", "cio", "coo", "founder", "principal", "staff engineer", "head of", "director",
    "vp", "vice president", "chief",
];

/// Signal contributions and the member-count cutoffs they key on.
#[derive(Debug, Clone)]
pub struct ScoreWeights {
    pub tech_company: u32,
    pub senior_title: u32,
    pub org_handle: u32,
    pub large_org: u32,
    pub medium_org: u32,
    pub large_org_members: u32,
    pub medium_org_members: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            tech_company: 12,
            senior_title: 16,
            org_handle: 6,
            large_org: 16,
            medium_org: 8,
            large_org_members: 50,
            medium_org_members: 10,
        }
    }
}

pub struct HeuristicScorer {
    weights: ScoreWeights,
    company_patterns: Vec<Regex>,
    title_patterns: Vec<Regex>,
}

impl HeuristicScorer {
    pub fn new(weights: ScoreWeights) -> Self {
        Self {
            weights,
            company_patterns: compile_word_patterns(COMPANY_PATTERNS),
            title_patterns: compile_word_patterns(TITLE_PATTERNS),
        }
    }

    /// Scores one stargazer. Both company-based signals may fire at once;
    /// they are independent, not mutually exclusive.
    pub fn score(&self, stargazer: &Stargazer) -> ProspectScore {
        let mut score = 0u32;
        let mut reasons: Vec<String> = Vec::new();

        if let Some(company) = stargazer.company.as_deref() {
            if self.company_patterns.iter().any(|p| p.is_match(company)) {
                score += self.weights.tech_company;
                reasons.push("known tech company".to_string());
            }
            if self.title_patterns.iter().any(|p| p.is_match(company)) {
                score += self.weights.senior_title;
                reasons.push("senior title".to_string());
            }
        }

        if let Some(org) = stargazer.company_org.as_deref().filter(|o| !o.is_empty()) {
            score += self.weights.org_handle;
            reasons.push(format!("org @{org}"));
        }

        if let Some(members) = stargazer.company_public_members {
            if members >= self.weights.large_org_members {
                score += self.weights.large_org;
                reasons.push("large public member count".to_string());
            } else if members >= self.weights.medium_org_members {
                score += self.weights.medium_org;
                reasons.push("medium public member count".to_string());
            }
        }

        let reason = if reasons.is_empty() {
            "baseline".to_string()
        } else {
            reasons.join(", ")
        };

        ProspectScore { score, reason }
    }
}

impl Default for HeuristicScorer {
    fn default() -> Self {
        Self::new(ScoreWeights::default())
    }
}

#[async_trait]
impl ProspectRanker for HeuristicScorer {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    async fn rank(&self, stargazers: &[Stargazer]) -> Result<HashMap<String, ProspectScore>> {
        Ok(stargazers
            .iter()
            .map(|s| (s.login.clone(), self.score(s)))
            .collect())
    }
}

/// Compiles each pattern case-insensitively with word boundaries, so "meta"
/// matches "Meta Platforms" but not "Metabase".
fn compile_word_patterns(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|pattern| Regex::new(&format!(r"(?i)\b{pattern}\b")).unwrap())
        .collect()
}
