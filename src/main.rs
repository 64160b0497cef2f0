use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing::{info, warn};

use prospector::config::{self, Config};

/// Prospector: community topic analysis and stargazer prospect ranking.
///
/// Turns a Discord channel export into a browsable topic index, surfaces
/// unanswered questions, and ranks a GitHub repo's stargazers as sales
/// prospects.
#[derive(Parser)]
#[command(name = "prospector", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the cache database
    Init,

    /// Build (or show) the topic index for a channel
    Topics {
        /// Channel name the export belongs to
        #[arg(long)]
        channel: String,

        /// Discord export JSON to import (required on first run)
        #[arg(long)]
        file: Option<PathBuf>,

        /// Number of topic clusters to form (default: 6)
        #[arg(long, default_value = "6")]
        clusters: usize,

        /// Re-import the export and recompute the index
        #[arg(long)]
        refresh: bool,
    },

    /// Show representative example messages for a topic or free-text query
    Examples {
        /// Channel name the export belongs to
        #[arg(long)]
        channel: String,

        /// Topic label from `prospector topics`
        #[arg(long)]
        topic: Option<String>,

        /// Free-text query matched against the whole channel
        #[arg(long)]
        query: Option<String>,

        /// Discord export JSON to import (required on first run)
        #[arg(long)]
        file: Option<PathBuf>,

        /// Max examples to show (default: 3)
        #[arg(long, default_value = "3")]
        limit: usize,
    },

    /// List questions nobody answered
    Questions {
        /// Channel name the export belongs to
        #[arg(long)]
        channel: String,

        /// Discord export JSON to import (required on first run)
        #[arg(long)]
        file: Option<PathBuf>,

        /// How many following messages count as the reply window (default: 10)
        #[arg(long, default_value = "10")]
        window: usize,
    },

    /// Show channel activity statistics
    Stats {
        /// Channel name the export belongs to
        #[arg(long)]
        channel: String,

        /// Discord export JSON to import (required on first run)
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Rank a repo's stargazers as sales prospects
    Prospects {
        /// Repository owner (user or org)
        owner: String,

        /// Repository name
        repo: String,

        /// Stargazer snapshot JSON to import instead of fetching
        #[arg(long)]
        file: Option<PathBuf>,

        /// Max stargazers to fetch from the API (default: 400)
        #[arg(long, default_value = "400")]
        max: usize,

        /// Profiles to enrich in parallel (default: 8)
        #[arg(long, default_value = "8")]
        concurrency: usize,

        /// Refetch even if cached stargazers are still fresh
        #[arg(long)]
        refresh: bool,

        /// Ranking backend: heuristic or llm (default: PROSPECTOR_RANKER)
        #[arg(long)]
        ranker: Option<String>,
    },

    /// Generate a markdown digest (prospects, topics, open questions)
    Report {
        /// Repository owner (user or org)
        owner: String,

        /// Repository name
        repo: String,

        /// Channel whose topics and open questions to include
        #[arg(long)]
        channel: Option<String>,

        /// Output path for the markdown file
        #[arg(long, default_value = "output/prospector-digest.md")]
        output: String,
    },

    /// Show system status (DB stats, cache breakdown)
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("prospector=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            info!("Initializing Prospector database...");
            let config = Config::load()?;
            let conn = prospector::db::initialize(&config.db_path)?;
            let table_count = prospector::db::schema::table_count(&conn)?;
            println!("Database initialized at: {}", config.db_path);
            println!("Tables created: {table_count}");
            println!("\nProspector is ready. Next steps:");
            println!("  prospector topics --channel <name> --file <export.json>");
            println!("  prospector prospects <owner> <repo>");
        }

        Commands::Topics {
            channel,
            file,
            clusters,
            refresh,
        } => {
            let config = Config::load()?;
            let conn = prospector::db::open(&config.db_path)?;

            // Check for a cached index first, unless the run changes its inputs
            let defaults = prospector::analysis::index::IndexParams::default();
            if !refresh && file.is_none() && clusters == defaults.clusters {
                if let Some(index) = prospector::pipeline::topics::load_cached(&conn, &channel)? {
                    println!("Loading cached topic index for #{channel}...");
                    index.display();
                    println!(
                        "{}",
                        format!(
                            "To rebuild, run: prospector topics --channel {channel} --refresh"
                        )
                        .dimmed()
                    );
                    return Ok(());
                }
            }

            // --refresh without a new file reclusters the cached snapshot
            let reimport = refresh && file.is_some();
            let messages = prospector::sources::messages::load_messages(
                &conn,
                &channel,
                file.as_deref(),
                reimport,
            )?;
            println!("Analyzing {} messages...", messages.len());

            let params = prospector::analysis::index::IndexParams {
                clusters,
                ..Default::default()
            };
            let index = prospector::pipeline::topics::run(
                &conn,
                &channel,
                &messages,
                &prospector::analysis::tokenize::Tokenizer::default(),
                &params,
            )?;
            index.display();
        }

        Commands::Examples {
            channel,
            topic,
            query,
            file,
            limit,
        } => {
            let config = Config::load()?;
            let conn = prospector::db::open(&config.db_path)?;
            let messages = prospector::sources::messages::load_messages(
                &conn,
                &channel,
                file.as_deref(),
                false,
            )?;
            let tokenizer = prospector::analysis::tokenize::Tokenizer::default();
            let params = prospector::analysis::retrieve::ExampleParams::default();

            match (topic, query) {
                (Some(label), _) => {
                    let index = load_or_build_index(&conn, &channel, &messages, &tokenizer)?;
                    let Some(topic) = index
                        .topics
                        .iter()
                        .find(|t| t.label.eq_ignore_ascii_case(&label))
                    else {
                        let labels: Vec<&str> =
                            index.topics.iter().map(|t| t.label.as_str()).collect();
                        anyhow::bail!(
                            "No topic labeled '{label}'. Available: {}",
                            labels.join(", ")
                        );
                    };
                    let examples = prospector::analysis::retrieve::examples_for_topic(
                        &topic.label,
                        &topic.message_ids,
                        &messages,
                        &tokenizer,
                        limit,
                        &params,
                    );
                    prospector::output::terminal::display_examples(&topic.label, &examples);
                }
                (None, Some(query)) => {
                    let examples = prospector::analysis::retrieve::examples_for_query(
                        &query,
                        &messages,
                        &tokenizer,
                        limit,
                        &params,
                    );
                    prospector::output::terminal::display_examples(&query, &examples);
                }
                (None, None) => {
                    anyhow::bail!("Pass --topic <label> or --query <text>.");
                }
            }
        }

        Commands::Questions {
            channel,
            file,
            window,
        } => {
            let config = Config::load()?;
            let conn = prospector::db::open(&config.db_path)?;
            let messages = prospector::sources::messages::load_messages(
                &conn,
                &channel,
                file.as_deref(),
                false,
            )?;

            let params = prospector::analysis::questions::QuestionParams {
                window,
                ..Default::default()
            };
            let questions = prospector::analysis::questions::find_unanswered(
                &messages,
                &prospector::analysis::tokenize::Tokenizer::default(),
                &params,
            );
            prospector::db::queries::cache_put(
                &conn,
                &format!("questions:{channel}"),
                &serde_json::to_string(&questions)?,
                None,
            )?;
            prospector::output::terminal::display_questions(&questions);
        }

        Commands::Stats { channel, file } => {
            let config = Config::load()?;
            let conn = prospector::db::open(&config.db_path)?;
            let messages = prospector::sources::messages::load_messages(
                &conn,
                &channel,
                file.as_deref(),
                false,
            )?;

            let stats = prospector::stats::compute_stats(&messages);
            prospector::db::queries::cache_put(
                &conn,
                &format!("stats:{channel}"),
                &serde_json::to_string(&stats)?,
                None,
            )?;
            stats.display(&channel);
        }

        Commands::Prospects {
            owner,
            repo,
            file,
            max,
            concurrency,
            refresh,
            ranker,
        } => {
            let config = Config::load()?;
            let conn = prospector::db::open(&config.db_path)?;
            let client = prospector::sources::github::GithubClient::new(config.github_token.clone())?;

            if config.github_token.is_none() && file.is_none() {
                println!(
                    "  {} no GITHUB_TOKEN set, unauthenticated rate limits apply",
                    "Warning:".yellow()
                );
            }

            let backend = resolve_backend(&config, ranker.as_deref())?;
            let (rankers, fallback) = build_rankers(&config, &backend)?;

            let options = prospector::pipeline::prospects::ProspectOptions {
                max_stargazers: max,
                concurrency,
                refresh,
                cache_ttl_secs: config.cache_ttl_secs,
            };
            let prospects = prospector::pipeline::prospects::run(
                &conn,
                &client,
                &owner,
                &repo,
                file.as_deref(),
                &rankers,
                &fallback,
                &options,
            )
            .await?;

            prospector::output::terminal::display_prospect_list(&prospects);
        }

        Commands::Report {
            owner,
            repo,
            channel,
            output,
        } => {
            let config = Config::load()?;
            let conn = prospector::db::open(&config.db_path)?;

            let Some(prospects) = prospector::pipeline::prospects::load_cached(&conn, &owner, &repo)?
            else {
                anyhow::bail!(
                    "No ranked prospects for {owner}/{repo}. Run `prospector prospects {owner} {repo}` first."
                );
            };

            let mut topics = None;
            let mut questions = Vec::new();
            if let Some(channel) = channel.as_deref() {
                match prospector::sources::messages::load_messages(&conn, channel, None, false) {
                    Ok(messages) => {
                        let tokenizer = prospector::analysis::tokenize::Tokenizer::default();
                        let index = load_or_build_index(&conn, channel, &messages, &tokenizer)?;
                        questions = prospector::analysis::questions::find_unanswered(
                            &messages,
                            &tokenizer,
                            &prospector::analysis::questions::QuestionParams::default(),
                        );
                        topics = Some(index);
                    }
                    Err(e) => {
                        warn!(error = %e, channel, "Skipping community sections");
                        println!(
                            "  {} no cached messages for #{channel}, skipping community sections",
                            "Warning:".yellow()
                        );
                    }
                }
            }

            prospector::output::terminal::display_prospect_list(&prospects);

            prospector::output::markdown::generate_report(
                &prospects,
                topics.as_ref(),
                &questions,
                &output,
            )?;

            println!("\n{}", format!("Markdown report saved to: {output}").bold());
        }

        Commands::Status => {
            let config = Config::load()?;
            prospector::status::show(&config.db_path)?;
        }
    }

    Ok(())
}

/// Pick the ranking backend: the CLI flag wins over PROSPECTOR_RANKER.
fn resolve_backend(
    config: &Config,
    flag: Option<&str>,
) -> Result<config::RankerBackend> {
    match flag {
        Some("heuristic") => Ok(config::RankerBackend::Heuristic),
        Some("llm") => Ok(config::RankerBackend::Llm),
        Some(other) => anyhow::bail!("Unknown ranker '{other}'. Valid values: heuristic, llm"),
        None => Ok(config.ranker_backend.clone()),
    }
}

/// Build the ranker chain for the chosen backend. The heuristic scorer is
/// always constructed since it backfills whatever the chain misses.
fn build_rankers(
    config: &Config,
    backend: &config::RankerBackend,
) -> Result<(
    Vec<Box<dyn prospector::scoring::traits::ProspectRanker>>,
    prospector::scoring::heuristic::HeuristicScorer,
)> {
    let fallback = prospector::scoring::heuristic::HeuristicScorer::default();
    let rankers: Vec<Box<dyn prospector::scoring::traits::ProspectRanker>> = match backend {
        config::RankerBackend::Heuristic => Vec::new(),
        config::RankerBackend::Llm => {
            info!("Using LLM prospect ranker");
            vec![Box::new(prospector::scoring::llm::LlmRanker::from_config(
                config,
            )?)]
        }
    };
    Ok((rankers, fallback))
}

/// Load the cached topic index for a channel, or build and cache one from
/// the given messages with default parameters.
fn load_or_build_index(
    conn: &rusqlite::Connection,
    channel: &str,
    messages: &[prospector::sources::messages::Message],
    tokenizer: &prospector::analysis::tokenize::Tokenizer,
) -> Result<prospector::analysis::index::TopicIndex> {
    match prospector::pipeline::topics::load_cached(conn, channel)? {
        Some(index) => Ok(index),
        None => prospector::pipeline::topics::run(
            conn,
            channel,
            messages,
            tokenizer,
            &prospector::analysis::index::IndexParams::default(),
        ),
    }
}
