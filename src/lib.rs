//! ATS-style resume scoring
//!
//! Two entry points: [`ats_score`] blends rule-based section, keyword,
//! formatting and context analyzers; [`calculate_ats_score`] compares
//! embeddings of the resume and job description, falls back to word overlap
//! when the model is unavailable, and adds strengths, weaknesses and
//! improvement suggestions.

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod processing;
pub mod output;

pub use config::Config;
pub use error::{AtsScorerError, Result};
pub use processing::aggregator::{ats_score, HeuristicBreakdown, HeuristicScorer};
pub use processing::embeddings::{Model2VecProvider, SimilarityProvider};
pub use processing::insights::{identify_strengths, identify_weaknesses, suggest_improvements};
pub use processing::result::{AnalysisResult, ContentAnalysis, FormatAnalysis};
pub use processing::semantic::{calculate_ats_score, SemanticScorer};
