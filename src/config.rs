//! Configuration management for the ATS scorer

use crate::error::{AtsScorerError, Result};
use crate::processing::aggregator::AggregatorWeights;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: ModelConfig,
    pub scoring: ScoringConfig,
    pub vocabulary: VocabularyConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// HuggingFace repo id or local model folder
    pub embedding_model: String,
    /// When false the semantic scorer starts in degraded mode
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub degraded_derating: f64,
    pub fuzzy_threshold: f64,
    pub proximity_window: usize,
    pub well_formatted_threshold: f64,
    pub max_derived_keywords: usize,
    pub weights: AggregatorWeights,
}

/// Term lists driving keyword importance and skill extraction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularyConfig {
    pub technical: Vec<String>,
    pub framework: Vec<String>,
    pub cloud: Vec<String>,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            embedding_model: "minishlab/potion-base-8M".to_string(),
            enabled: true,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            degraded_derating: 0.8,
            fuzzy_threshold: 0.8,
            proximity_window: 50,
            well_formatted_threshold: 0.5,
            max_derived_keywords: 25,
            weights: AggregatorWeights::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            color_output: true,
        }
    }
}

fn to_strings(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|s| s.to_string()).collect()
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            technical: to_strings(&[
                "python", "java", "javascript", "react", "aws", "cloud", "ml", "ai",
                "docker", "kubernetes", "sql", "nosql", "devops", "security",
            ]),
            framework: to_strings(&[
                "react", "angular", "vue", "django", "flask", "spring", "express",
                "tensorflow", "pytorch", "scikit-learn",
            ]),
            cloud: to_strings(&[
                "aws", "azure", "gcp", "cloud", "s3", "ec2", "lambda", "kubernetes",
                "docker", "terraform",
            ]),
            skills: to_strings(&[
                // Programming Languages
                "rust", "python", "javascript", "typescript", "java", "c++", "c#", "go", "ruby",
                "php", "swift", "kotlin", "scala", "haskell", "matlab", "sql",

                // Web Technologies
                "react", "vue", "angular", "svelte", "html", "css", "sass", "tailwind",
                "node.js", "express", "next.js", "django", "flask", "spring", "graphql", "rest",

                // Backend/Infrastructure
                "docker", "kubernetes", "aws", "azure", "gcp", "terraform", "ansible",
                "jenkins", "ci/cd", "devops", "microservices", "grpc", "redis", "kafka",
                "elasticsearch", "nginx", "linux", "git",

                // Databases
                "postgresql", "mysql", "mongodb", "cassandra", "dynamodb", "sqlite", "nosql",

                // Data Science/ML
                "machine learning", "deep learning", "tensorflow", "pytorch", "scikit-learn",
                "pandas", "numpy", "spark", "hadoop", "airflow", "nlp",

                // Testing
                "pytest", "junit", "selenium", "cypress", "tdd",

                // Practices and soft skills
                "agile", "scrum", "leadership", "communication", "teamwork", "problem solving",
                "project management", "mentoring", "collaboration",
            ]),
        }
    }
}

impl Config {
    /// Load the user configuration, writing defaults when no file exists yet
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::from_file(&config_path)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Read the user configuration if present; never touches the filesystem otherwise
    pub fn load_or_default() -> Self {
        let config_path = Self::config_path();
        if !config_path.exists() {
            return Self::default();
        }

        match Self::from_file(&config_path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring unreadable config {}: {}", config_path.display(), e);
                Self::default()
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| AtsScorerError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| AtsScorerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("ats-scorer")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        let weights = &self.scoring.weights;
        for (name, value) in [
            ("section", weights.section),
            ("keyword", weights.keyword),
            ("format", weights.format),
            ("context", weights.context),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AtsScorerError::Configuration(format!(
                    "scoring.weights.{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        if (weights.sum() - 1.0).abs() > 1e-6 {
            return Err(AtsScorerError::Configuration(format!(
                "scoring weights must sum to 1.0, got {:.4}",
                weights.sum()
            )));
        }

        for (name, value) in [
            ("degraded_derating", self.scoring.degraded_derating),
            ("fuzzy_threshold", self.scoring.fuzzy_threshold),
            ("well_formatted_threshold", self.scoring.well_formatted_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AtsScorerError::Configuration(format!(
                    "scoring.{} must be within [0, 1], got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}
