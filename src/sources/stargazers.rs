// Stargazer ingest and company-field parsing.

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// One GitHub user who starred the tracked repository, plus whatever employer
/// context enrichment has been able to fill in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stargazer {
    pub login: String,
    #[serde(default)]
    pub starred_at: Option<String>,
    /// Free-text company field from the user profile.
    #[serde(default)]
    pub company: Option<String>,
    /// Organization handle pulled out of `company` ("@acme" -> "acme").
    #[serde(default)]
    pub company_org: Option<String>,
    /// Public member count of `company_org`, when resolvable.
    #[serde(default)]
    pub company_public_members: Option<u32>,
}

/// Extracts the first `@handle` mention from a company string, lowercased.
/// Tolerates one space after the `@` ("CTO @ Stripe" -> "stripe").
pub fn parse_company_org(company: &str) -> Option<String> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| Regex::new(r"@ ?([A-Za-z0-9][A-Za-z0-9-]*)").unwrap());

    pattern
        .captures(company)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_lowercase())
}

pub fn cache_key(owner: &str, repo: &str) -> String {
    format!("stargazers:{owner}/{repo}")
}

/// Reads a pre-fetched stargazer list from a JSON file.
pub fn read_file(path: &Path) -> Result<Vec<Stargazer>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read stargazer file {}", path.display()))?;
    let stargazers: Vec<Stargazer> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse stargazer file {}", path.display()))?;
    Ok(stargazers)
}
