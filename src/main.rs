//! commitlens - CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use commitlens::ToolResponse;
use commitlens::api::{analyze_changes, analyze_commit_message_quality, generate_commit_message};

/// Analyze working-tree changes and suggest conventional commit messages.
#[derive(Parser, Debug)]
#[command(name = "commitlens")]
#[command(about = "Analyze working-tree changes and suggest conventional commit messages")]
#[command(version)]
struct Cli {
    /// Repository working tree to analyze
    #[arg(long, global = true, default_value = ".")]
    repo: PathBuf,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report staged and unstaged changes with stats and categories
    Analyze,
    /// Suggest a conventional commit message for the staged changes
    Message,
    /// Score a commit message against conventional commit practice
    Score {
        /// The message to score
        message: String,
    },
}

fn main() -> Result<ExitCode> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Command::Analyze => print_response(&analyze_changes(&cli.repo), cli.pretty),
        Command::Message => print_response(&generate_commit_message(&cli.repo), cli.pretty),
        Command::Score { message } => {
            print_response(&analyze_commit_message_quality(message), cli.pretty)
        }
    }
}

fn print_response<T: Serialize>(response: &ToolResponse<T>, pretty: bool) -> Result<ExitCode> {
    let json = if pretty {
        serde_json::to_string_pretty(response)
    } else {
        serde_json::to_string(response)
    }
    .context("Failed to serialize response")?;

    println!("{json}");

    Ok(if response.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
