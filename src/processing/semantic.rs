//! Embedding-similarity scoring with a word-overlap fallback

use crate::config::Config;
use crate::error::{AtsScorerError, Result};
use crate::processing::aggregator::round2;
use crate::processing::embeddings::{cosine_similarity, validate_embeddings, Model2VecProvider, SimilarityProvider};
use crate::processing::insights::InsightGenerator;
use crate::processing::result::{AnalysisResult, ContentAnalysis, FormatAnalysis};
use crate::processing::text::unique_words;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::sync::OnceLock;

/// Sections whose names the semantic format check looks for
const FORMAT_SECTIONS: [&str; 4] = ["education", "experience", "skills", "projects"];
/// How many missing words the content suggestion lists
const SUGGESTED_KEYWORDS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScorerMode {
    Ready,
    Degraded,
}

enum ProviderState {
    Ready(Box<dyn SimilarityProvider>),
    /// Reason the provider is unavailable; never retried for this scorer
    Degraded(String),
}

pub struct SemanticScorer {
    state: ProviderState,
    derating: f64,
    insights: InsightGenerator,
}

impl SemanticScorer {
    /// Load the configured embedding model; a load failure leaves the scorer degraded
    pub fn from_config(config: &Config) -> Result<Self> {
        let state = if !config.model.enabled {
            log::info!("Embedding model disabled, using basic scoring");
            ProviderState::Degraded("embedding model disabled in configuration".to_string())
        } else {
            match Model2VecProvider::load(&config.model.embedding_model) {
                Ok(provider) => ProviderState::Ready(Box::new(provider)),
                Err(e) => {
                    log::error!("Error initializing semantic scorer: {}", e);
                    ProviderState::Degraded(e.to_string())
                }
            }
        };

        Self::with_state(state, config)
    }

    pub fn with_provider(provider: Box<dyn SimilarityProvider>, config: &Config) -> Result<Self> {
        Self::with_state(ProviderState::Ready(provider), config)
    }

    pub fn degraded(reason: impl Into<String>, config: &Config) -> Result<Self> {
        Self::with_state(ProviderState::Degraded(reason.into()), config)
    }

    fn with_state(state: ProviderState, config: &Config) -> Result<Self> {
        Ok(Self {
            state,
            derating: config.scoring.degraded_derating,
            insights: InsightGenerator::from_config(config)?,
        })
    }

    pub fn mode(&self) -> ScorerMode {
        match self.state {
            ProviderState::Ready(_) => ScorerMode::Ready,
            ProviderState::Degraded(_) => ScorerMode::Degraded,
        }
    }

    pub fn provider_name(&self) -> Option<&str> {
        match &self.state {
            ProviderState::Ready(provider) => Some(provider.name()),
            ProviderState::Degraded(_) => None,
        }
    }

    pub fn degraded_reason(&self) -> Option<&str> {
        match &self.state {
            ProviderState::Ready(_) => None,
            ProviderState::Degraded(reason) => Some(reason.as_str()),
        }
    }

    pub fn insights(&self) -> &InsightGenerator {
        &self.insights
    }

    /// Score without insights; any provider error falls back to word overlap for this call
    pub fn calculate_ats_score(&self, resume_text: &str, job_description: &str) -> AnalysisResult {
        let provider = match &self.state {
            ProviderState::Ready(provider) => provider,
            ProviderState::Degraded(_) => {
                log::warn!("Semantic scorer not initialized, using basic scoring");
                return self.basic_ats_score(resume_text, job_description);
            }
        };

        match self.semantic_ats_score(provider.as_ref(), resume_text, job_description) {
            Ok(result) => result,
            Err(e) => {
                log::error!("Error calculating ATS score: {}", e);
                self.basic_ats_score(resume_text, job_description)
            }
        }
    }

    /// Score plus strengths, weaknesses and improvements
    pub fn analyze(&self, resume_text: &str, job_description: &str) -> AnalysisResult {
        let mut result = self.calculate_ats_score(resume_text, job_description);
        let insights = self.insights.generate(resume_text, job_description);

        result.strengths = Some(insights.strengths);
        result.weaknesses = Some(insights.weaknesses);
        result.improvements = Some(insights.improvements);
        result
    }

    fn semantic_ats_score(
        &self,
        provider: &dyn SimilarityProvider,
        resume_text: &str,
        job_description: &str,
    ) -> Result<AnalysisResult> {
        let texts = vec![resume_text.to_string(), job_description.to_string()];
        let embeddings = provider.encode(&texts)?;
        validate_embeddings(texts.len(), &embeddings)?;

        let similarity = cosine_similarity(&embeddings[0], &embeddings[1])?;
        if !similarity.is_finite() {
            return Err(AtsScorerError::Embedding(format!("non-finite similarity {}", similarity)));
        }
        log::debug!("{} similarity {:.4}", provider.name(), similarity);

        Ok(AnalysisResult {
            ats_score: clamp_score(f64::from(similarity) * 100.0),
            format_analysis: analyze_format(resume_text),
            content_analysis: analyze_content(resume_text, job_description),
            ..AnalysisResult::default()
        })
    }

    /// Word-overlap score, derated, with placeholder analyses
    fn basic_ats_score(&self, resume_text: &str, job_description: &str) -> AnalysisResult {
        let overlap = WordOverlap::new(resume_text, job_description);

        let match_score = if overlap.job_word_count == 0 {
            0.0
        } else {
            overlap.common as f64 / overlap.job_word_count as f64 * 100.0
        };

        AnalysisResult {
            ats_score: clamp_score(match_score * self.derating),
            format_analysis: FormatAnalysis::basic(),
            content_analysis: ContentAnalysis {
                keyword_match: overlap.common,
                missing_keywords: overlap.missing,
                suggestions: vec!["Add missing keywords to improve ATS score".to_string()],
            },
            ..AnalysisResult::default()
        }
    }
}

fn clamp_score(score: f64) -> f64 {
    round2(score.clamp(0.0, 100.0))
}

/// Overlap between the lower-cased whitespace-delimited words of both texts
struct WordOverlap {
    common: usize,
    job_word_count: usize,
    /// Job words absent from the resume, in job-description order
    missing: Vec<String>,
}

impl WordOverlap {
    fn new(resume_text: &str, job_description: &str) -> Self {
        let resume_words: HashSet<String> = unique_words(resume_text).into_iter().collect();
        let job_words = unique_words(job_description);

        let (present, missing): (Vec<String>, Vec<String>) = job_words
            .into_iter()
            .partition(|word| resume_words.contains(word));

        Self {
            common: present.len(),
            job_word_count: present.len() + missing.len(),
            missing,
        }
    }
}

/// Presence of the four major section names, scored 0 to 100
pub fn analyze_format(resume_text: &str) -> FormatAnalysis {
    let lowered = resume_text.to_lowercase();
    let (found, missing): (Vec<&str>, Vec<&str>) = FORMAT_SECTIONS
        .iter()
        .copied()
        .partition(|section| lowered.contains(*section));

    let mut issues = Vec::new();
    if !missing.is_empty() {
        issues.push(format!("Missing sections: {}", missing.join(", ")));
    }

    FormatAnalysis {
        score: round2(found.len() as f64 / FORMAT_SECTIONS.len() as f64 * 100.0),
        issues,
        suggestions: vec![
            "Ensure all major sections are present".to_string(),
            "Use consistent formatting throughout".to_string(),
            "Include clear section headers".to_string(),
        ],
    }
}

/// Job-description words found in and missing from the resume
pub fn analyze_content(resume_text: &str, job_description: &str) -> ContentAnalysis {
    let overlap = WordOverlap::new(resume_text, job_description);

    let mut suggestions = Vec::new();
    if !overlap.missing.is_empty() {
        let first: Vec<&str> = overlap
            .missing
            .iter()
            .take(SUGGESTED_KEYWORDS)
            .map(String::as_str)
            .collect();
        suggestions.push(format!("Add these keywords: {}", first.join(", ")));
    }

    ContentAnalysis {
        keyword_match: overlap.common,
        missing_keywords: overlap.missing,
        suggestions,
    }
}

/// Process-wide scorer, built from the user configuration on first access.
///
/// The first attempt decides the mode for the rest of the process; a failed
/// model load is not retried.
pub fn global_scorer() -> Option<&'static SemanticScorer> {
    static SCORER: OnceLock<Option<SemanticScorer>> = OnceLock::new();
    SCORER
        .get_or_init(|| match SemanticScorer::from_config(&Config::load_or_default()) {
            Ok(scorer) => Some(scorer),
            Err(e) => {
                log::error!("Failed to build semantic scorer: {}", e);
                None
            }
        })
        .as_ref()
}

/// Semantic ATS score with strengths, weaknesses and improvements.
///
/// Never fails: provider problems degrade to word overlap and anything else
/// yields [`AnalysisResult::empty`].
pub fn calculate_ats_score(resume_text: &str, job_description: &str) -> AnalysisResult {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        global_scorer().map(|scorer| scorer.analyze(resume_text, job_description))
    }));

    match outcome {
        Ok(Some(result)) => result,
        Ok(None) => AnalysisResult::empty(),
        Err(_) => {
            log::error!("Error calculating ATS score: scorer panicked");
            AnalysisResult::empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Returns preset vectors in order, ignoring the texts
    struct FixedProvider(Vec<Vec<f32>>);

    impl SimilarityProvider for FixedProvider {
        fn encode(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(self.0.clone())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    struct FailingProvider;

    impl SimilarityProvider for FailingProvider {
        fn encode(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Err(AtsScorerError::Embedding("backend offline".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    const RESUME: &str = "Experience: built python services\nSkills: python docker\nEducation: BSc";
    const JOB: &str = "python docker kubernetes terraform";

    fn scorer_with(provider: impl SimilarityProvider + 'static) -> SemanticScorer {
        SemanticScorer::with_provider(Box::new(provider), &Config::default()).unwrap()
    }

    #[test]
    fn test_ready_mode_uses_cosine_similarity() {
        let scorer = scorer_with(FixedProvider(vec![vec![1.0, 0.0], vec![0.6, 0.8]]));
        assert_eq!(scorer.mode(), ScorerMode::Ready);
        assert_eq!(scorer.provider_name(), Some("fixed"));

        let result = scorer.calculate_ats_score(RESUME, JOB);
        assert!((result.ats_score - 60.0).abs() < 1e-6);
        assert!(!result.is_degraded());
        // education, experience and skills present; projects missing
        assert_eq!(result.format_analysis.score, 75.0);
        assert_eq!(result.format_analysis.issues, vec!["Missing sections: projects".to_string()]);
        assert_eq!(result.content_analysis.keyword_match, 2);
        assert_eq!(result.content_analysis.missing_keywords, vec!["kubernetes", "terraform"]);
        assert_eq!(
            result.content_analysis.suggestions,
            vec!["Add these keywords: kubernetes, terraform".to_string()]
        );
        assert!(result.strengths.is_none());
    }

    #[test]
    fn test_negative_similarity_is_clamped() {
        let scorer = scorer_with(FixedProvider(vec![vec![1.0, 0.0], vec![-1.0, 0.0]]));
        assert_eq!(scorer.calculate_ats_score(RESUME, JOB).ats_score, 0.0);
    }

    #[test]
    fn test_provider_error_falls_back_for_the_call() {
        let scorer = scorer_with(FailingProvider);
        let result = scorer.calculate_ats_score(RESUME, JOB);

        assert!(result.is_degraded());
        // 2 of 4 job words present, derated by 0.8
        assert!((result.ats_score - 40.0).abs() < 1e-9);
        assert_eq!(result.format_analysis, FormatAnalysis::basic());
        assert_eq!(result.content_analysis.keyword_match, 2);
        assert_eq!(
            result.content_analysis.suggestions,
            vec!["Add missing keywords to improve ATS score".to_string()]
        );
        // the provider is still considered available
        assert_eq!(scorer.mode(), ScorerMode::Ready);
    }

    #[test]
    fn test_malformed_embeddings_fall_back() {
        let scorer = scorer_with(FixedProvider(vec![vec![1.0, 0.0]]));
        assert!(scorer.calculate_ats_score(RESUME, JOB).is_degraded());
    }

    #[test]
    fn test_degraded_scorer() {
        let scorer = SemanticScorer::degraded("no model", &Config::default()).unwrap();
        assert_eq!(scorer.mode(), ScorerMode::Degraded);
        assert_eq!(scorer.degraded_reason(), Some("no model"));

        let result = scorer.analyze(RESUME, JOB);
        assert!(result.is_degraded());
        assert!((result.ats_score - 40.0).abs() < 1e-9);
        assert!(result.strengths.is_some());
        assert!(result.weaknesses.is_some());
        assert!(result.improvements.is_some());
    }

    #[test]
    fn test_disabled_model_starts_degraded() {
        let mut config = Config::default();
        config.model.enabled = false;
        let scorer = SemanticScorer::from_config(&config).unwrap();
        assert_eq!(scorer.mode(), ScorerMode::Degraded);
    }

    #[test]
    fn test_empty_job_description_scores_zero() {
        let scorer = SemanticScorer::degraded("no model", &Config::default()).unwrap();
        let result = scorer.analyze(RESUME, "");
        assert_eq!(result.ats_score, 0.0);
        assert!(result.content_analysis.missing_keywords.is_empty());
        assert_eq!(result.strengths, Some(vec![]));
    }

    #[test]
    fn test_analyze_is_idempotent() {
        let scorer = scorer_with(FixedProvider(vec![vec![0.3, 0.4], vec![0.4, 0.3]]));
        assert_eq!(scorer.analyze(RESUME, JOB), scorer.analyze(RESUME, JOB));
    }

    #[test]
    fn test_analyze_format_all_sections() {
        let analysis = analyze_format("EDUCATION\nEXPERIENCE\nSKILLS\nPROJECTS");
        assert_eq!(analysis.score, 100.0);
        assert!(analysis.issues.is_empty());
        assert_eq!(analysis.suggestions.len(), 3);
    }

    #[test]
    fn test_content_suggestion_lists_first_five() {
        let content = analyze_content("nothing here", "a b c d e f g");
        assert_eq!(content.keyword_match, 0);
        assert_eq!(content.missing_keywords.len(), 7);
        assert_eq!(content.suggestions, vec!["Add these keywords: a, b, c, d, e".to_string()]);
    }
}
