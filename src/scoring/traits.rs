// Prospect ranker trait — the swap-ready abstraction.
//
// Rankers are tried in order; the first that returns a non-empty result wins,
// and the heuristic scorer backfills anything the winner left out. The trait
// is async because the interesting implementation calls an LLM over HTTP.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;

use crate::sources::stargazers::Stargazer;

/// The result of ranking a single stargazer.
#[derive(Debug, Clone)]
pub struct ProspectScore {
    /// 0 (nothing interesting) to 100 (drop everything and reach out).
    pub score: u32,
    /// Human-readable explanation of why the score is what it is.
    pub reason: String,
}

/// Trait for ranking a batch of stargazers as sales prospects.
#[async_trait]
pub trait ProspectRanker: Send + Sync {
    /// Short name recorded on each prospect this ranker scored.
    fn name(&self) -> &'static str;

    /// Rank a batch, keyed by login. A ranker may return a partial map;
    /// missing logins fall through to the fallback scorer.
    async fn rank(&self, stargazers: &[Stargazer]) -> Result<HashMap<String, ProspectScore>>;
}
