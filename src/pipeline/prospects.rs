// Prospect pipeline: load stargazers (cache, file, or API), enrich them
// with employer context, rank them, and cache the ranked list.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use rusqlite::Connection;
use tracing::{info, warn};

use crate::db::models::RankedProspect;
use crate::db::queries::{cache_get, cache_put};
use crate::scoring::heuristic::HeuristicScorer;
use crate::scoring::traits::{ProspectRanker, ProspectScore};
use crate::sources::github::GithubClient;
use crate::sources::stargazers::{self, parse_company_org, Stargazer};

pub struct ProspectOptions {
    pub max_stargazers: usize,
    pub concurrency: usize,
    pub refresh: bool,
    pub cache_ttl_secs: i64,
}

pub fn cache_key(owner: &str, repo: &str) -> String {
    format!("prospects:{owner}/{repo}")
}

/// Fetches, enriches, ranks, and caches the prospect list for a repo.
pub async fn run(
    conn: &Connection,
    client: &GithubClient,
    owner: &str,
    repo: &str,
    file: Option<&Path>,
    rankers: &[Box<dyn ProspectRanker>],
    fallback: &HeuristicScorer,
    options: &ProspectOptions,
) -> Result<Vec<RankedProspect>> {
    let gazers = load_stargazers(conn, client, owner, repo, file, options).await?;
    if gazers.is_empty() {
        info!(owner, repo, "No stargazers found, nothing to rank");
        return Ok(Vec::new());
    }

    let prospects = rank_with_fallback(rankers, fallback, &gazers).await;
    cache_put(
        conn,
        &cache_key(owner, repo),
        &serde_json::to_string(&prospects)?,
        None,
    )?;
    info!(owner, repo, ranked = prospects.len(), "Cached ranked prospects");
    Ok(prospects)
}

/// Returns the ranked list from an earlier run, if one exists.
pub fn load_cached(conn: &Connection, owner: &str, repo: &str) -> Result<Option<Vec<RankedProspect>>> {
    let key = cache_key(owner, repo);
    match cache_get(conn, &key)? {
        Some(raw) => {
            let prospects = serde_json::from_str(&raw)
                .with_context(|| format!("Corrupt cached prospects under '{key}'"))?;
            Ok(Some(prospects))
        }
        None => Ok(None),
    }
}

/// Loads stargazers for `owner/repo`. Order of preference: the TTL cache
/// (unless `refresh`), a local snapshot file, then the GitHub API. Fresh
/// loads are enriched with employer context before caching.
pub async fn load_stargazers(
    conn: &Connection,
    client: &GithubClient,
    owner: &str,
    repo: &str,
    file: Option<&Path>,
    options: &ProspectOptions,
) -> Result<Vec<Stargazer>> {
    let key = stargazers::cache_key(owner, repo);

    if !options.refresh {
        if let Some(raw) = cache_get(conn, &key)? {
            let cached: Vec<Stargazer> = serde_json::from_str(&raw)
                .with_context(|| format!("Corrupt cached stargazers under '{key}'"))?;
            if !cached.is_empty() {
                info!(owner, repo, count = cached.len(), "Loaded stargazers from cache");
                return Ok(cached);
            }
        }
    }

    let fetched = match file {
        Some(path) => {
            let list = stargazers::read_file(path)?;
            info!(count = list.len(), path = %path.display(), "Imported stargazer snapshot");
            list
        }
        None => {
            println!("  Fetching stargazers for {owner}/{repo}...");
            client
                .fetch_stargazers(owner, repo, options.max_stargazers)
                .await?
        }
    };

    let enriched = enrich(client, fetched, options.concurrency).await;
    cache_put(
        conn,
        &key,
        &serde_json::to_string(&enriched)?,
        Some(options.cache_ttl_secs),
    )?;
    Ok(enriched)
}

/// Fills in company, org handle, and org size for each stargazer. Lookup
/// failures keep the bare record rather than dropping it. Input order is
/// preserved.
async fn enrich(client: &GithubClient, gazers: Vec<Stargazer>, concurrency: usize) -> Vec<Stargazer> {
    if gazers.is_empty() {
        return gazers;
    }
    let concurrency = concurrency.max(1);

    println!(
        "  Enriching {} stargazer profiles ({} concurrent)...",
        gazers.len(),
        concurrency
    );
    let pb = ProgressBar::new(gazers.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("  Enriching [{bar:30}] {pos}/{len} ({eta})")
            .unwrap(),
    );

    let pb_ref = &pb;
    let mut results: Vec<(usize, Stargazer)> = stream::iter(
        gazers
            .into_iter()
            .enumerate()
            .map(|(position, gazer)| async move {
                let enriched = enrich_one(client, gazer).await;
                pb_ref.inc(1);
                (position, enriched)
            }),
    )
    .buffer_unordered(concurrency)
    .collect()
    .await;
    pb.finish_and_clear();

    results.sort_by_key(|(position, _)| *position);
    results.into_iter().map(|(_, gazer)| gazer).collect()
}

async fn enrich_one(client: &GithubClient, mut gazer: Stargazer) -> Stargazer {
    if gazer.company.is_none() {
        match client.fetch_user(&gazer.login).await {
            Ok(profile) => gazer.company = profile.company,
            Err(e) => {
                warn!(login = %gazer.login, error = %e, "Profile fetch failed, keeping bare record");
                return gazer;
            }
        }
    }

    if gazer.company_org.is_none() {
        if let Some(company) = gazer.company.as_deref() {
            gazer.company_org = parse_company_org(company);
        }
    }

    if gazer.company_public_members.is_none() {
        if let Some(org) = gazer.company_org.clone() {
            match client.fetch_org_public_members(&org).await {
                Ok(count) => gazer.company_public_members = Some(count),
                Err(e) => {
                    warn!(login = %gazer.login, org = %org, error = %e, "Org lookup failed");
                }
            }
        }
    }

    gazer
}

/// Runs the ranker chain in order and keeps the first non-empty result.
/// Candidates the winning ranker skipped are backfilled from the
/// heuristic scorer, so every stargazer comes back ranked. Scores are
/// capped at 100.
pub async fn rank_with_fallback(
    rankers: &[Box<dyn ProspectRanker>],
    fallback: &HeuristicScorer,
    gazers: &[Stargazer],
) -> Vec<RankedProspect> {
    let mut scores: HashMap<String, ProspectScore> = HashMap::new();
    let mut ranked_by = fallback.name();

    for ranker in rankers {
        match ranker.rank(gazers).await {
            Ok(map) if !map.is_empty() => {
                info!(ranker = ranker.name(), ranked = map.len(), "Ranking complete");
                scores = map;
                ranked_by = ranker.name();
                break;
            }
            Ok(_) => {
                warn!(ranker = ranker.name(), "Ranker returned nothing, trying next");
            }
            Err(e) => {
                warn!(ranker = ranker.name(), error = %e, "Ranker failed, trying next");
            }
        }
    }

    let mut prospects: Vec<RankedProspect> = gazers
        .iter()
        .map(|gazer| {
            let (score, source) = match scores.remove(&gazer.login) {
                Some(s) => (s, ranked_by),
                None => (fallback.score(gazer), fallback.name()),
            };
            RankedProspect {
                login: gazer.login.clone(),
                score: score.score.min(100),
                reason: score.reason,
                ranked_by: source.to_string(),
                company: gazer.company.clone(),
                company_org: gazer.company_org.clone(),
                company_public_members: gazer.company_public_members,
                starred_at: gazer.starred_at.clone(),
            }
        })
        .collect();

    prospects.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| a.login.cmp(&b.login)));
    prospects
}
