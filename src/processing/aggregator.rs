//! Rule-based ATS score: weighted blend of the four lexical analyzers

use crate::config::Config;
use crate::error::Result;
use crate::processing::context::ContextAnalyzer;
use crate::processing::formatting::FormattingAnalyzer;
use crate::processing::keywords::{KeywordMatcher, KeywordReport};
use crate::processing::sections::{SectionDetector, SectionScores};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorWeights {
    pub section: f64,
    pub keyword: f64,
    pub format: f64,
    pub context: f64,
}

impl Default for AggregatorWeights {
    fn default() -> Self {
        Self {
            section: 0.25,
            keyword: 0.35,
            format: 0.20,
            context: 0.20,
        }
    }
}

impl AggregatorWeights {
    pub fn sum(&self) -> f64 {
        self.section + self.keyword + self.format + self.context
    }
}

/// Component scores behind a heuristic ATS score
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeuristicBreakdown {
    pub sections: SectionScores,
    pub section_score: f64,
    pub keywords: KeywordReport,
    pub keyword_score: f64,
    pub format_score: f64,
    pub context_score: f64,
    /// Final score in [0, 100], two decimals
    pub ats_score: f64,
}

pub struct HeuristicScorer {
    sections: SectionDetector,
    keywords: KeywordMatcher,
    formatting: FormattingAnalyzer,
    context: ContextAnalyzer,
    weights: AggregatorWeights,
}

impl HeuristicScorer {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            sections: SectionDetector::new(),
            keywords: KeywordMatcher::from_config(config)?,
            formatting: FormattingAnalyzer::new(),
            context: ContextAnalyzer::new(),
            weights: config.scoring.weights,
        })
    }

    pub fn score(&self, resume_text: &str, job_keywords: &[String]) -> f64 {
        self.breakdown(resume_text, job_keywords).ats_score
    }

    pub fn breakdown(&self, resume_text: &str, job_keywords: &[String]) -> HeuristicBreakdown {
        let keywords: Vec<String> = job_keywords
            .iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();
        if resume_text.is_empty() || keywords.is_empty() {
            return HeuristicBreakdown::default();
        }

        let lowered = resume_text.to_lowercase();

        let sections = self.sections.section_scores(&lowered);
        let section_score = self.sections.score(&lowered).clamp(0.0, 1.0);
        let keyword_report = self.keywords.analyze(&lowered, &keywords);
        let keyword_score = keyword_report.score.clamp(0.0, 1.0);
        // formatting looks at capitalization, so it gets the case-preserved text
        let format_score = self.formatting.score(resume_text).clamp(0.0, 1.0);
        let context_score = self.context.score(&lowered, &keywords).clamp(0.0, 1.0);

        let combined = section_score * self.weights.section
            + keyword_score * self.weights.keyword
            + format_score * self.weights.format
            + context_score * self.weights.context;
        let ats_score = round2((combined * 100.0).clamp(0.0, 100.0));

        log::debug!(
            "heuristic score {:.2} (sections {:.3}, keywords {:.3}, format {:.3}, context {:.3})",
            ats_score, section_score, keyword_score, format_score, context_score
        );

        HeuristicBreakdown {
            sections,
            section_score,
            keywords: keyword_report,
            keyword_score,
            format_score,
            context_score,
            ats_score,
        }
    }
}

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn default_scorer() -> Option<&'static HeuristicScorer> {
    static SCORER: OnceLock<Option<HeuristicScorer>> = OnceLock::new();
    SCORER
        .get_or_init(|| match HeuristicScorer::from_config(&Config::default()) {
            Ok(scorer) => Some(scorer),
            Err(e) => {
                log::error!("Failed to build default heuristic scorer: {}", e);
                None
            }
        })
        .as_ref()
}

/// Heuristic ATS score in [0, 100] using the built-in vocabularies and weights.
///
/// Returns exactly 0.0 for an empty resume or an empty keyword list.
pub fn ats_score(resume_text: &str, job_keywords: &[String]) -> f64 {
    default_scorer().map_or(0.0, |scorer| scorer.score(resume_text, job_keywords))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    const RESUME: &str = "Jane Doe\n\
        jane@example.com | 555-123-4567\n\
        SUMMARY\n\
        Backend engineer focused on Python services.\n\
        EXPERIENCE:\n\
        - Built Python APIs deployed with Docker on AWS\n\
        - Automated Kubernetes rollouts\n\
        SKILLS:\n\
        Python, Docker, Kubernetes, AWS\n\
        EDUCATION\n\
        BSc Computer Science, 2016\n";

    #[test]
    fn test_default_weights_sum_to_one() {
        assert!((AggregatorWeights::default().sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_inputs_score_zero() {
        assert_eq!(ats_score("", &keywords(&["python"])), 0.0);
        assert_eq!(ats_score(RESUME, &[]), 0.0);
        assert_eq!(ats_score(RESUME, &keywords(&["  ", ""])), 0.0);
    }

    #[test]
    fn test_score_in_range_and_rounded() {
        let score = ats_score(RESUME, &keywords(&["python", "docker", "kubernetes", "aws", "graphql"]));
        assert!(score > 0.0 && score <= 100.0);
        assert!(((score * 100.0).round() - score * 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_breakdown_matches_weighted_sum() {
        let scorer = HeuristicScorer::from_config(&Config::default()).unwrap();
        let b = scorer.breakdown(RESUME, &keywords(&["python", "docker"]));
        let expected = round2(
            100.0 * (b.section_score * 0.25 + b.keyword_score * 0.35 + b.format_score * 0.20 + b.context_score * 0.20),
        );
        assert_eq!(b.ats_score, expected);
        assert_eq!(b.keyword_score, 1.0);
    }

    #[test]
    fn test_relevant_resume_beats_unrelated_keywords() {
        let relevant = ats_score(RESUME, &keywords(&["python", "docker", "aws"]));
        let unrelated = ats_score(RESUME, &keywords(&["accounting", "payroll", "bookkeeping"]));
        assert!(relevant > unrelated);
    }

    #[test]
    fn test_idempotent() {
        let kws = keywords(&["python", "machine learning", "terraform"]);
        assert_eq!(ats_score(RESUME, &kws), ats_score(RESUME, &kws));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(12.345678), 12.35);
        assert_eq!(round2(0.0), 0.0);
    }
}
