//! Result structures returned by the semantic scoring path

use serde::{Deserialize, Serialize};

/// Issue text marking a result produced without the embedding model
pub const BASIC_ANALYSIS_MARKER: &str = "Basic analysis only";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormatAnalysis {
    pub score: f64,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
}

impl FormatAnalysis {
    /// Placeholder used when the detailed analysis is unavailable
    pub fn basic() -> Self {
        Self {
            score: 50.0,
            issues: vec![BASIC_ANALYSIS_MARKER.to_string()],
            suggestions: vec!["Try again later for detailed format analysis".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentAnalysis {
    /// Number of job-description words also found in the resume
    pub keyword_match: usize,
    pub missing_keywords: Vec<String>,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Overall score in [0, 100]
    pub ats_score: f64,
    pub format_analysis: FormatAnalysis,
    pub content_analysis: ContentAnalysis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strengths: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weaknesses: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub improvements: Option<Vec<String>>,
}

impl AnalysisResult {
    /// All-zero result returned when scoring fails outright
    pub fn empty() -> Self {
        Self {
            strengths: Some(Vec::new()),
            weaknesses: Some(Vec::new()),
            improvements: Some(Vec::new()),
            ..Self::default()
        }
    }

    /// True when the score came from the word-overlap fallback
    pub fn is_degraded(&self) -> bool {
        self.format_analysis
            .issues
            .iter()
            .any(|issue| issue == BASIC_ANALYSIS_MARKER)
    }

    pub fn has_insights(&self) -> bool {
        self.strengths.is_some() || self.weaknesses.is_some() || self.improvements.is_some()
    }
}
