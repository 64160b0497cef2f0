// Data models — the ranked-prospect record and its display tier.
//
// These are the types that flow through the application. They're separate
// from the database queries so other modules can use them without depending
// on rusqlite directly.

use serde::{Deserialize, Serialize};

/// A stargazer after ranking, ready for display or reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedProspect {
    pub login: String,
    /// 0-100 composite score.
    pub score: u32,
    pub reason: String,
    /// Which ranker produced the score ("llm" or "heuristic").
    pub ranked_by: String,
    pub company: Option<String>,
    pub company_org: Option<String>,
    pub company_public_members: Option<u32>,
    pub starred_at: Option<String>,
}

impl RankedProspect {
    pub fn tier(&self) -> ProspectTier {
        ProspectTier::from_score(self.score)
    }
}

/// Outreach priority bucket. Cutoffs are display-only; the score itself is
/// what gets persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProspectTier {
    Cold,
    Cool,
    Warm,
    Hot,
}

impl ProspectTier {
    /// Determine the tier from a prospect score (0-100).
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 40 => ProspectTier::Hot,
            s if s >= 25 => ProspectTier::Warm,
            s if s >= 10 => ProspectTier::Cool,
            _ => ProspectTier::Cold,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProspectTier::Cold => "Cold",
            ProspectTier::Cool => "Cool",
            ProspectTier::Warm => "Warm",
            ProspectTier::Hot => "Hot",
        }
    }
}

impl std::fmt::Display for ProspectTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
