//! Report structures shared by every output format

use crate::processing::aggregator::HeuristicBreakdown;
use crate::processing::result::AnalysisResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A scored resume plus where and how the score was produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    pub metadata: ReportMetadata,
    pub result: ReportKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", content = "details", rename_all = "lowercase")]
pub enum ReportKind {
    /// Rule-based score over an explicit or derived keyword list
    Heuristic {
        keywords: Vec<String>,
        breakdown: HeuristicBreakdown,
    },
    /// Embedding similarity (or its fallback) with insights
    Semantic(AnalysisResult),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub resume_file: String,
    pub job_file: Option<String>,
    /// Embedding model name, absent for heuristic or degraded scoring
    pub model: Option<String>,
    pub processing_time_ms: u64,
}

impl ScoreReport {
    pub fn heuristic(metadata: ReportMetadata, keywords: Vec<String>, breakdown: HeuristicBreakdown) -> Self {
        Self {
            metadata,
            result: ReportKind::Heuristic { keywords, breakdown },
        }
    }

    pub fn semantic(metadata: ReportMetadata, result: AnalysisResult) -> Self {
        Self {
            metadata,
            result: ReportKind::Semantic(result),
        }
    }

    /// Final score in [0, 100]
    pub fn ats_score(&self) -> f64 {
        match &self.result {
            ReportKind::Heuristic { breakdown, .. } => breakdown.ats_score,
            ReportKind::Semantic(result) => result.ats_score,
        }
    }

    pub fn verdict(&self) -> &'static str {
        verdict_for(self.ats_score())
    }
}

impl ReportMetadata {
    pub fn new(resume_file: impl Into<String>, job_file: Option<String>) -> Self {
        Self {
            generated_at: Utc::now(),
            resume_file: resume_file.into(),
            job_file,
            model: None,
            processing_time_ms: 0,
        }
    }
}

pub fn verdict_for(score: f64) -> &'static str {
    match score {
        s if s >= 80.0 => "Strong match, likely to pass ATS screening",
        s if s >= 60.0 => "Good match with room for improvement",
        s if s >= 40.0 => "Partial match, tailor the resume to this role",
        _ => "Weak match, significant changes needed",
    }
}
