//! Ask command handler.
//!
//! Answers one question from the command line.

use clap::Args;
use std::path::PathBuf;
use wikiqa_agent::{validate_question, Agent, AgentResponse};
use wikiqa_core::{config::AppConfig, AppError, AppResult};

/// Ask a question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    #[arg(conflicts_with = "file")]
    pub question: Option<String>,

    /// Read the question from a file
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");

        let input = self.get_question()?;
        let question = validate_question(&input)?;
        tracing::debug!(%question, "Question received");

        let agent = Agent::from_config(config)?;
        let response = agent.process_question(question).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&response)?);
        } else {
            println!("{}", render_text(&response));
        }

        Ok(())
    }

    /// Get the question from the positional argument or the file.
    fn get_question(&self) -> AppResult<String> {
        match (&self.question, &self.file) {
            (Some(question), _) => Ok(question.clone()),
            (None, Some(path)) => Ok(std::fs::read_to_string(path)?),
            (None, None) => Err(AppError::InvalidInput(
                "No question provided. Pass it as an argument or with --file.".to_string(),
            )),
        }
    }
}

/// Plain-text rendering: answer, numbered sources, reasoning.
fn render_text(response: &AgentResponse) -> String {
    let mut out = response.answer.clone();

    if !response.sources.is_empty() {
        out.push_str("\n\nSources:");
        for (i, source) in response.sources.iter().enumerate() {
            out.push_str(&format!("\n  [{}] {}", i + 1, source));
        }
    }

    out.push_str("\n\n");
    out.push_str(&response.reasoning);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn command(question: Option<&str>, file: Option<PathBuf>) -> AskCommand {
        AskCommand {
            question: question.map(str::to_string),
            file,
            json: false,
        }
    }

    #[test]
    fn test_question_from_argument() {
        let cmd = command(Some("What is the Eiffel Tower?"), None);
        assert_eq!(cmd.get_question().unwrap(), "What is the Eiffel Tower?");
    }

    #[test]
    fn test_question_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Who was Albert Einstein?").unwrap();

        let cmd = command(None, Some(file.path().to_path_buf()));
        let input = cmd.get_question().unwrap();
        assert_eq!(validate_question(&input).unwrap(), "Who was Albert Einstein?");
    }

    #[test]
    fn test_missing_question_is_invalid_input() {
        let result = command(None, None).get_question();
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let cmd = command(None, Some(PathBuf::from("/nonexistent/question.txt")));
        assert!(matches!(cmd.get_question(), Err(AppError::Io(_))));
    }

    #[test]
    fn test_render_text_numbers_sources() {
        let response = AgentResponse::completed(
            "It is a tower.".to_string(),
            vec![
                "https://en.wikipedia.org/wiki/Eiffel_Tower".to_string(),
                "https://en.wikipedia.org/wiki/Paris".to_string(),
            ],
            "I analyzed your question and decided to search Wikipedia for: \"Eiffel Tower\""
                .to_string(),
        );

        let text = render_text(&response);
        assert!(text.starts_with("It is a tower."));
        assert!(text.contains("[1] https://en.wikipedia.org/wiki/Eiffel_Tower"));
        assert!(text.contains("[2] https://en.wikipedia.org/wiki/Paris"));
        assert!(text.ends_with("\"Eiffel Tower\""));
    }

    #[test]
    fn test_render_text_without_sources() {
        let response = AgentResponse::content_unavailable("reasoning".to_string());
        assert!(!render_text(&response).contains("Sources:"));
    }
}
