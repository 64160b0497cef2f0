// GitHub REST client — stargazer pages, user profiles, org member counts.
//
// A thin JSON-over-HTTP wrapper. Rate-limit responses retry with exponential
// backoff; every other failure surfaces immediately with the response body in
// the error. GitHub reports rate limiting either as a 429 or as a 403 whose
// body mentions the rate limit, so the matcher checks error text, not status
// codes.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use super::stargazers::Stargazer;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Maximum retry attempts on rate-limit errors.
const MAX_RETRIES: u32 = 3;

/// Base delay for exponential backoff (doubles each retry).
const BASE_BACKOFF: Duration = Duration::from_secs(2);

/// Cap on the backoff delay.
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Stargazer pages use the `star+json` media type so `starred_at` comes back.
const STAR_MEDIA_TYPE: &str = "application/vnd.github.star+json";
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";

pub struct GithubClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl GithubClient {
    pub fn new(token: Option<String>) -> Result<Self> {
        Self::with_base_url(DEFAULT_API_URL, token)
    }

    /// Client against a non-default API root. Tests point this at a local
    /// stub server.
    pub fn with_base_url(base_url: &str, token: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent("prospector/0.1")
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Fetches up to `max` stargazers of `owner/repo`, oldest star first.
    pub async fn fetch_stargazers(
        &self,
        owner: &str,
        repo: &str,
        max: usize,
    ) -> Result<Vec<Stargazer>> {
        let mut stargazers: Vec<Stargazer> = Vec::new();
        if max == 0 {
            return Ok(stargazers);
        }

        let mut page = 1u32;
        loop {
            let url = format!(
                "{}/repos/{owner}/{repo}/stargazers?per_page=100&page={page}",
                self.base_url
            );
            let batch: Vec<StarRecord> = self.get_json(&url, STAR_MEDIA_TYPE).await?;
            let batch_len = batch.len();
            if batch_len == 0 {
                break;
            }

            stargazers.extend(batch.into_iter().map(|record| Stargazer {
                login: record.user.login,
                starred_at: record.starred_at,
                company: None,
                company_org: None,
                company_public_members: None,
            }));
            debug!(
                page,
                count = batch_len,
                total = stargazers.len(),
                "Fetched stargazer page"
            );

            if stargazers.len() >= max || batch_len < 100 {
                break;
            }
            page += 1;
        }

        stargazers.truncate(max);
        Ok(stargazers)
    }

    /// Profile lookup for one user; only the employer fields matter here.
    pub async fn fetch_user(&self, login: &str) -> Result<UserProfile> {
        let url = format!("{}/users/{login}", self.base_url);
        self.get_json(&url, JSON_MEDIA_TYPE).await
    }

    /// Public member count for an organization. One page only: past 100 the
    /// exact number stops mattering for scoring.
    pub async fn fetch_org_public_members(&self, org: &str) -> Result<u32> {
        let url = format!("{}/orgs/{org}/public_members?per_page=100", self.base_url);
        let members: Vec<OrgMember> = self.get_json(&url, JSON_MEDIA_TYPE).await?;
        Ok(members.len() as u32)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str, accept: &str) -> Result<T> {
        with_retry(|| self.get_once(url, accept)).await
    }

    async fn get_once<T: DeserializeOwned>(&self, url: &str, accept: &str) -> Result<T> {
        let mut request = self
            .client
            .get(url)
            .header("Accept", accept)
            .header("X-GitHub-Api-Version", "2022-11-28");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("GET {url} failed"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("GitHub API returned {status} for {url}: {body}");
        }

        response
            .json::<T>()
            .await
            .with_context(|| format!("Failed to decode response from {url}"))
    }
}

/// Retry an async operation with exponential backoff on rate-limit errors.
/// Non-rate-limit errors are returned immediately.
pub async fn with_retry<F, Fut, T>(operation: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut attempt = 0u32;

    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_rate_limit_error(&err) || attempt >= MAX_RETRIES {
                    return Err(err);
                }

                attempt += 1;

                let backoff = BASE_BACKOFF
                    .saturating_mul(1u32 << attempt)
                    .min(MAX_BACKOFF);

                // Jitter from the clock's nanosecond component, 0.75x-1.25x.
                let nanos = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .unwrap_or_default()
                    .subsec_nanos();
                let jitter_factor = 0.75 + (nanos % 500) as f64 / 1000.0;
                let jittered = Duration::from_secs_f64(backoff.as_secs_f64() * jitter_factor);

                warn!(
                    attempt,
                    max_retries = MAX_RETRIES,
                    "Rate limited, retrying in {:.1}s (attempt {}/{})",
                    jittered.as_secs_f64(),
                    attempt,
                    MAX_RETRIES,
                );

                tokio::time::sleep(jittered).await;
            }
        }
    }
}

/// Check whether an error looks like a rate-limit response. The error text
/// includes the response body, so GitHub's rate-limited 403s match too.
fn is_rate_limit_error(err: &anyhow::Error) -> bool {
    let debug_str = format!("{:?}", err);
    debug_str.contains("429")
        || debug_str.to_lowercase().contains("rate limit")
        || debug_str.to_lowercase().contains("ratelimit")
}

// ---- GitHub API response types ----

#[derive(Debug, Deserialize)]
struct StarRecord {
    #[serde(default)]
    starred_at: Option<String>,
    user: StarUser,
}

#[derive(Debug, Deserialize)]
struct StarUser {
    login: String,
}

/// Subset of the user profile payload; everything else is ignored.
#[derive(Debug, Deserialize)]
pub struct UserProfile {
    pub login: String,
    #[serde(default)]
    pub company: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrgMember {
    #[allow(dead_code)]
    login: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_rate_limit_error_with_429() {
        assert!(is_rate_limit_error(&anyhow::anyhow!(
            "GitHub API returned 429 Too Many Requests for url: slow down"
        )));
    }

    #[test]
    fn test_is_rate_limit_error_with_403_body() {
        assert!(is_rate_limit_error(&anyhow::anyhow!(
            "GitHub API returned 403 Forbidden for url: API rate limit exceeded for 1.2.3.4"
        )));
    }

    #[test]
    fn test_is_rate_limit_error_plain_403() {
        assert!(!is_rate_limit_error(&anyhow::anyhow!(
            "GitHub API returned 403 Forbidden for url: Resource protected by organization SAML"
        )));
    }

    #[test]
    fn test_is_rate_limit_error_other() {
        assert!(!is_rate_limit_error(&anyhow::anyhow!("connection refused")));
    }

    #[test]
    fn test_star_record_parses() {
        let raw = r#"{"starred_at": "2024-05-01T00:00:00Z", "user": {"login": "octocat"}}"#;
        let record: StarRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.user.login, "octocat");
        assert_eq!(record.starred_at.as_deref(), Some("2024-05-01T00:00:00Z"));
    }
}
