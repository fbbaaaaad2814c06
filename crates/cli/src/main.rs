//! wikiqa CLI
//!
//! Main entry point for the wikiqa command-line tool.
//! Answers questions from Wikipedia, once from the shell or over HTTP.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ServeCommand};
use wikiqa_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;
use std::process::ExitCode;

/// wikiqa - grounded answers from Wikipedia
#[derive(Parser, Debug)]
#[command(name = "wikiqa")]
#[command(about = "Answer questions with an LLM grounded in Wikipedia", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "WIKIQA_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// LLM provider (openai, ollama)
    #[arg(short, long, global = true, env = "WIKIQA_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "WIKIQA_MODEL")]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ask a question
    Ask(AskCommand),

    /// Serve the agent over HTTP
    Serve(ServeCommand),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match failure_message(run(cli).await) {
        None => ExitCode::SUCCESS,
        Some(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> AppResult<()> {
    // Defaults, then the config file, then the environment
    let config = AppConfig::load_from(cli.config)?;

    let config = config.with_overrides(
        cli.provider,
        cli.model,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("wikiqa starting");
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Serve(_) => "serve",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Serve(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}

/// The line printed to stderr when a command fails: the error's display form.
fn failure_message(result: AppResult<()>) -> Option<String> {
    result.err().map(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wikiqa_core::AppError;

    #[test]
    fn test_success_prints_nothing() {
        assert_eq!(failure_message(Ok(())), None);
    }

    #[test]
    fn test_failure_prints_plain_message() {
        let message = failure_message(Err(AppError::Processing(
            "Failed to process your question. Please try again.".to_string(),
        )));
        assert_eq!(
            message.as_deref(),
            Some("Failed to process your question. Please try again.")
        );

        let message = failure_message(Err(AppError::InvalidInput(
            "Please provide a valid question.".to_string(),
        )))
        .unwrap();
        assert!(!message.contains("InvalidInput"));
    }

    #[test]
    fn test_cli_parses_ask() {
        let cli = Cli::try_parse_from(["wikiqa", "ask", "What is the Eiffel Tower?", "--json"]).unwrap();
        match cli.command {
            Commands::Ask(cmd) => {
                assert_eq!(cmd.question.as_deref(), Some("What is the Eiffel Tower?"));
                assert!(cmd.json);
            }
            other => panic!("Expected ask, got {:?}", other),
        }
    }
}
