//! CLI interface for the ATS scorer

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ats-scorer")]
#[command(about = "Score resumes the way an applicant tracking system would")]
#[command(long_about = "Score a resume against a job description with rule-based ATS heuristics or embedding similarity, and list strengths, weaknesses and improvements")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rule-based ATS score against a keyword list
    Score {
        /// Path to resume file (TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Comma-separated keywords, e.g. "python,docker,machine learning"
        #[arg(short, long, conflicts_with = "job")]
        keywords: Option<String>,

        /// Job description to derive keywords from (TXT, MD)
        #[arg(short, long)]
        job: Option<PathBuf>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Show per-section scores
        #[arg(short, long)]
        detailed: bool,
    },

    /// Semantic ATS score with strengths, weaknesses and improvements
    Analyze {
        /// Path to resume file (TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (TXT, MD)
        #[arg(short, long)]
        job: PathBuf,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Skip the embedding model and use word-overlap scoring
        #[arg(long)]
        offline: bool,

        /// Show suggestions and missing words in full
        #[arg(short, long)]
        detailed: bool,
    },

    /// Show or reset configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown", format)),
    }
}

/// Split a comma-separated keyword list, dropping blanks
pub fn parse_keyword_list(keywords: &str) -> Vec<String> {
    keywords
        .split(',')
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("JSON"), Ok(OutputFormat::Json));
        assert_eq!(parse_output_format("md"), Ok(OutputFormat::Markdown));
        assert!(parse_output_format("pdf").is_err());
    }

    #[test]
    fn test_parse_keyword_list() {
        assert_eq!(
            parse_keyword_list(" python, ,machine learning,docker "),
            vec!["python", "machine learning", "docker"]
        );
        assert!(parse_keyword_list(" , ").is_empty());
    }

    #[test]
    fn test_keywords_conflict_with_job() {
        let parsed = Cli::try_parse_from([
            "ats-scorer", "score", "--resume", "r.txt", "--keywords", "rust", "--job", "j.txt",
        ]);
        assert!(parsed.is_err());
    }
}
