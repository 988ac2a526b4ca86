//! ats-scorer: ATS-style resume scoring from the command line

use ats_scorer::cli::{self, Cli, Commands, ConfigAction};
use ats_scorer::config::{Config, OutputFormat};
use ats_scorer::error::{AtsScorerError, Result};
use ats_scorer::input::InputManager;
use ats_scorer::output::formatter::{save_report_to_file, ReportGenerator};
use ats_scorer::output::report::{ReportMetadata, ScoreReport};
use ats_scorer::processing::aggregator::HeuristicScorer;
use ats_scorer::processing::semantic::SemanticScorer;
use ats_scorer::processing::text::TextProcessor;
use clap::Parser;
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path),
        None => Config::load(),
    }
}

fn resolve_format(requested: Option<&str>, config: &Config) -> Result<OutputFormat> {
    match requested {
        Some(format) => cli::parse_output_format(format).map_err(AtsScorerError::InvalidInput),
        None => Ok(config.output.format),
    }
}

/// Print the report, or write it to `save` without terminal colors
fn emit_report(
    report: &ScoreReport,
    format: OutputFormat,
    save: Option<PathBuf>,
    detailed: bool,
    config: &Config,
) -> Result<()> {
    match save {
        Some(path) => {
            let generator = ReportGenerator::with_options(false, detailed, true, true);
            let content = generator.generate_report(report, format)?;
            save_report_to_file(&content, &path)?;
            println!("💾 Report saved to {}", path.display());
        }
        None => {
            let generator = ReportGenerator::with_options(config.output.color_output, detailed, true, true);
            println!("{}", generator.generate_report(report, format)?);
        }
    }
    Ok(())
}

async fn run_command(command: Commands, config: Config) -> Result<()> {
    match command {
        Commands::Score {
            resume,
            keywords,
            job,
            output,
            save,
            detailed,
        } => {
            let format = resolve_format(output.as_deref(), &config)?;
            let start_time = Instant::now();
            let mut input_manager = InputManager::new();

            let resume_text = input_manager.extract_text(&resume).await?;

            let keywords = match (keywords, &job) {
                (Some(list), _) => cli::parse_keyword_list(&list),
                (None, Some(job_path)) => {
                    let job_text = input_manager.extract_text(job_path).await?;
                    TextProcessor::new().extract_keywords(&job_text, config.scoring.max_derived_keywords)
                }
                (None, None) => {
                    return Err(AtsScorerError::InvalidInput(
                        "Provide --keywords or --job to score against".to_string(),
                    ));
                }
            };
            info!("Scoring {} against {} keywords", resume.display(), keywords.len());

            let scorer = HeuristicScorer::from_config(&config)?;
            let breakdown = scorer.breakdown(&resume_text, &keywords);

            let mut metadata = ReportMetadata::new(
                resume.to_string_lossy(),
                job.as_ref().map(|p| p.to_string_lossy().to_string()),
            );
            metadata.processing_time_ms = start_time.elapsed().as_millis() as u64;

            let report = ScoreReport::heuristic(metadata, keywords, breakdown);
            emit_report(&report, format, save, detailed, &config)?;
        }

        Commands::Analyze {
            resume,
            job,
            output,
            save,
            offline,
            detailed,
        } => {
            let format = resolve_format(output.as_deref(), &config)?;
            let start_time = Instant::now();
            let mut input_manager = InputManager::new();

            let resume_text = input_manager.extract_text(&resume).await?;
            let job_text = input_manager.extract_text(&job).await?;

            let scorer = if offline {
                SemanticScorer::degraded("offline mode requested", &config)?
            } else {
                SemanticScorer::from_config(&config)?
            };
            info!("Analyzing {} in {:?} mode", resume.display(), scorer.mode());

            let result = scorer.analyze(&resume_text, &job_text);

            let mut metadata = ReportMetadata::new(
                resume.to_string_lossy(),
                Some(job.to_string_lossy().to_string()),
            );
            if !result.is_degraded() {
                metadata.model = scorer.provider_name().map(str::to_string);
            }
            metadata.processing_time_ms = start_time.elapsed().as_millis() as u64;

            let report = ScoreReport::semantic(metadata, result);
            emit_report(&report, format, save, detailed, &config)?;
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                let content = toml::to_string_pretty(&config).map_err(|e| {
                    AtsScorerError::Configuration(format!("Failed to serialize config: {}", e))
                })?;
                println!("⚙️  Current Configuration ({})\n", Config::config_path().display());
                println!("{}", content);
            }

            Some(ConfigAction::Reset) => {
                println!("🔄 Resetting configuration to defaults...");
                Config::default().save()?;
                println!("✅ Configuration reset successfully!");
            }

            Some(ConfigAction::Path) => {
                println!("{}", Config::config_path().display());
            }
        },
    }

    Ok(())
}
