// Colored terminal output for prospect lists, examples, and questions.
//
// Everything screen-specific lives here so main.rs only decides WHAT to
// show, never how to paint it.

use colored::Colorize;

use super::truncate_chars;
use crate::db::models::RankedProspect;
use crate::sources::messages::Message;

/// Display a ranked prospect list in the terminal.
pub fn display_prospect_list(prospects: &[RankedProspect]) {
    if prospects.is_empty() {
        println!("No prospects ranked yet. Run `prospector prospects` first.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Prospect Report ({} stargazers) ===", prospects.len()).bold()
    );
    println!();

    // Header
    println!(
        "  {:>4}  {:<22} {:>5}  {:<6}  {:<26}  {}",
        "Rank".dimmed(),
        "Login".dimmed(),
        "Score".dimmed(),
        "Tier".dimmed(),
        "Company".dimmed(),
        "Why".dimmed(),
    );
    println!("  {}", "-".repeat(96).dimmed());

    for (i, prospect) in prospects.iter().enumerate() {
        let tier = prospect.tier();
        let company = prospect.company.as_deref().unwrap_or("-");

        println!(
            "  {:>4}. @{:<21} {:>5}  {:<6}  {:<26}  {}",
            i + 1,
            prospect.login,
            prospect.score,
            colorize_tier(tier.as_str()),
            truncate_chars(company, 24),
            truncate_chars(&prospect.reason, 48).dimmed(),
        );
    }

    println!();

    // Summary
    let hot = prospects.iter().filter(|p| p.tier().as_str() == "Hot").count();
    let warm = prospects.iter().filter(|p| p.tier().as_str() == "Warm").count();
    let cool = prospects.iter().filter(|p| p.tier().as_str() == "Cool").count();

    if hot > 0 {
        println!("  {} {} hot prospects", "!!".green().bold(), hot);
    }
    if warm > 0 {
        println!("  {} {} warm prospects", "!".yellow(), warm);
    }
    if cool > 0 {
        println!("  {} {} cool prospects", "~".cyan(), cool);
    }
}

/// Display example messages for a topic or query.
pub fn display_examples(needle: &str, examples: &[&Message]) {
    if examples.is_empty() {
        println!("No examples found for '{needle}'.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Examples for '{needle}' ({} messages) ===", examples.len()).bold()
    );
    println!();

    for (i, message) in examples.iter().enumerate() {
        let when = message.timestamp.as_deref().unwrap_or("undated");
        println!(
            "  {:>2}. {} {}",
            i + 1,
            message.display_name().bold(),
            when.dimmed()
        );
        println!("      {}", truncate_chars(&message.text, 160));
        if !message.attachments.is_empty() {
            println!(
                "      {}",
                format!("[{} attachment(s)]", message.attachments.len()).dimmed()
            );
        }
        println!();
    }
}

/// Display unanswered questions, oldest first.
pub fn display_questions(questions: &[String]) {
    if questions.is_empty() {
        println!("No unanswered questions found.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Unanswered Questions ({}) ===", questions.len()).bold()
    );
    println!();

    for (i, question) in questions.iter().enumerate() {
        println!("  {:>2}. {}", i + 1, truncate_chars(question, 160));
    }
    println!();
}

/// Color a tier name for terminal display.
fn colorize_tier(tier: &str) -> colored::ColoredString {
    match tier {
        "Hot" => tier.green().bold(),
        "Warm" => tier.yellow(),
        "Cool" => tier.cyan(),
        "Cold" => tier.dimmed(),
        _ => tier.normal(),
    }
}
