// Markdown report generation — a digest you can paste into a CRM note or
// hand to whoever does outreach.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;

use crate::analysis::index::TopicIndex;
use crate::db::models::{ProspectTier, RankedProspect};

/// Generate a markdown digest and write it to `path`.
///
/// `prospects` drives the summary and ranking tables; the topic index and
/// question list are optional sections that are simply omitted when absent.
/// Returns the rendered markdown.
pub fn generate_report(
    prospects: &[RankedProspect],
    topics: Option<&TopicIndex>,
    questions: &[String],
    path: &str,
) -> Result<String> {
    let mut out = String::new();

    out.push_str("# Prospector Digest\n\n");
    out.push_str(&format!(
        "Generated: {}\n\n",
        Utc::now().format("%Y-%m-%d %H:%M UTC")
    ));

    // Tier summary
    out.push_str("## Prospect Summary\n\n");
    out.push_str("| Tier | Count |\n");
    out.push_str("|------|-------|\n");
    for tier in [
        ProspectTier::Hot,
        ProspectTier::Warm,
        ProspectTier::Cool,
        ProspectTier::Cold,
    ] {
        let count = prospects.iter().filter(|p| p.tier() == tier).count();
        out.push_str(&format!("| {} | {} |\n", tier.as_str(), count));
    }
    out.push_str(&format!("| **Total** | **{}** |\n\n", prospects.len()));

    // Full ranking
    if !prospects.is_empty() {
        out.push_str("## Ranked Prospects\n\n");
        out.push_str("| Rank | Login | Score | Tier | Company | Why |\n");
        out.push_str("|------|-------|-------|------|---------|-----|\n");
        for (i, prospect) in prospects.iter().enumerate() {
            let company = prospect.company.as_deref().unwrap_or("-");
            out.push_str(&format!(
                "| {} | @{} | {} | {} | {} | {} |\n",
                i + 1,
                escape_pipes(&prospect.login),
                prospect.score,
                prospect.tier().as_str(),
                escape_pipes(company),
                escape_pipes(&prospect.reason),
            ));
        }
        out.push('\n');
    }

    // Topic index
    if let Some(index) = topics {
        out.push_str("## Community Topics\n\n");
        out.push_str(&format!(
            "Derived from {} messages.\n\n",
            index.message_count
        ));
        out.push_str("| Topic | Messages | Keywords |\n");
        out.push_str("|-------|----------|----------|\n");
        for topic in &index.topics {
            out.push_str(&format!(
                "| {} | {} | {} |\n",
                escape_pipes(&topic.label),
                topic.size,
                escape_pipes(&topic.keywords.join(", ")),
            ));
        }
        out.push('\n');
    }

    // Unanswered questions
    if !questions.is_empty() {
        out.push_str("## Unanswered Questions\n\n");
        for (i, question) in questions.iter().enumerate() {
            let flat = question.replace('\n', " ");
            out.push_str(&format!("{}. {}\n", i + 1, escape_pipes(&flat)));
        }
        out.push('\n');
    }

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create report directory for {path}"))?;
        }
    }
    fs::write(path, &out).with_context(|| format!("Failed to write report to {path}"))?;

    Ok(out)
}

/// Escape pipe characters so free text can't break a markdown table row.
fn escape_pipes(text: &str) -> String {
    text.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_pipes() {
        assert_eq!(escape_pipes("a | b"), "a \\| b");
        assert_eq!(escape_pipes("clean"), "clean");
    }
}
