//! Weighted keyword matching with proximity and fuzzy tiers

use crate::config::Config;
use crate::error::Result;
use crate::processing::text::{section_line_regex, TextProcessor};
use crate::processing::vocabulary::ImportanceVocabulary;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use strsim::normalized_damerau_levenshtein;

/// Sections whose heading line earns a context bonus when it mentions a matched keyword
const CONTEXT_SECTIONS: [&str; 3] = ["experience", "skills", "projects"];
const CONTEXT_BONUS_PER_SECTION: f64 = 0.1;
const MAX_DENSITY_BONUS: f64 = 0.3;
const PARTIAL_COVERAGE: f64 = 0.7;
/// Sub-words this short are ignored by the multi-word tiers
const MIN_SUBWORD_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchTier {
    Exact,
    Proximity,
    Partial,
    Fuzzy,
}

impl MatchTier {
    pub fn factor(self) -> f64 {
        match self {
            MatchTier::Exact => 1.0,
            MatchTier::Proximity => 0.9,
            MatchTier::Partial => 0.7,
            MatchTier::Fuzzy => 0.6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordMatch {
    pub keyword: String,
    pub importance: f64,
    pub tier: MatchTier,
    /// importance scaled by the tier factor
    pub weight: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeywordReport {
    pub matches: Vec<KeywordMatch>,
    pub missing: Vec<String>,
    pub total_weight: f64,
    pub weighted_score: f64,
    pub density_bonus: f64,
    pub context_bonus: f64,
    /// Final keyword score in [0, 1]
    pub score: f64,
}

impl KeywordReport {
    /// keyword -> achieved weight
    pub fn match_result(&self) -> HashMap<String, f64> {
        self.matches
            .iter()
            .map(|m| (m.keyword.clone(), m.weight))
            .collect()
    }

    pub fn matched_weight(&self) -> f64 {
        self.matches.iter().map(|m| m.weight).sum()
    }
}

pub struct KeywordMatcher {
    vocabulary: ImportanceVocabulary,
    text_processor: TextProcessor,
    context_sections: Vec<Regex>,
    fuzzy_threshold: f64,
    proximity_window: usize,
}

impl KeywordMatcher {
    pub fn new(vocabulary: ImportanceVocabulary, fuzzy_threshold: f64, proximity_window: usize) -> Self {
        Self {
            vocabulary,
            text_processor: TextProcessor::new(),
            context_sections: CONTEXT_SECTIONS.iter().map(|s| section_line_regex(s)).collect(),
            fuzzy_threshold: fuzzy_threshold.clamp(0.0, 1.0),
            proximity_window,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            ImportanceVocabulary::from_config(&config.vocabulary)?,
            config.scoring.fuzzy_threshold,
            config.scoring.proximity_window,
        ))
    }

    pub fn score(&self, resume_text: &str, keywords: &[String]) -> f64 {
        self.analyze(resume_text, keywords).score
    }

    pub fn analyze(&self, resume_text: &str, keywords: &[String]) -> KeywordReport {
        let keywords: Vec<String> = keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        if keywords.is_empty() {
            return KeywordReport::default();
        }

        let lowered = resume_text.to_lowercase();
        let clean_resume = self.text_processor.clean_for_matching(&lowered);
        let padded_resume = format!(" {} ", clean_resume);
        let resume_words: Vec<&str> = clean_resume.split_whitespace().collect();

        let mut seen = HashSet::new();
        let weighted: Vec<(&str, f64)> = keywords
            .iter()
            .filter(|k| seen.insert(k.as_str()))
            .map(|k| (k.as_str(), self.vocabulary.importance_weight(k)))
            .collect();
        let total_weight: f64 = weighted.iter().map(|(_, w)| w).sum();

        let mut matches = Vec::new();
        let mut missing = Vec::new();
        for (keyword, importance) in &weighted {
            match self.match_tier(keyword, &clean_resume, &padded_resume, &resume_words) {
                Some(tier) => matches.push(KeywordMatch {
                    keyword: keyword.to_string(),
                    importance: *importance,
                    tier,
                    weight: importance * tier.factor(),
                }),
                None => missing.push(keyword.to_string()),
            }
        }

        let weighted_score = if total_weight > 0.0 {
            matches.iter().fold(0.0, |acc, m| acc + m.weight) / total_weight
        } else {
            0.0
        };

        let density = matches.len() as f64 / keywords.len().max(1) as f64;
        let density_bonus = (density * 0.5).min(MAX_DENSITY_BONUS);
        let context_bonus = self.context_bonus(&lowered, &matches);

        let score = (weighted_score + density_bonus + context_bonus).min(1.0);
        log::debug!(
            "keyword score {:.3} (weighted {:.3}, density {:.3}, context {:.3})",
            score, weighted_score, density_bonus, context_bonus
        );

        KeywordReport {
            matches,
            missing,
            total_weight,
            weighted_score,
            density_bonus,
            context_bonus,
            score,
        }
    }

    /// First applicable tier wins
    fn match_tier(
        &self,
        keyword: &str,
        clean_resume: &str,
        padded_resume: &str,
        resume_words: &[&str],
    ) -> Option<MatchTier> {
        if padded_resume.contains(&format!(" {} ", keyword)) {
            return Some(MatchTier::Exact);
        }

        let parts: Vec<&str> = keyword.split_whitespace().collect();
        if parts.len() > 1 {
            return self.multi_word_tier(&parts, clean_resume);
        }

        if keyword.chars().count() > MIN_SUBWORD_LEN {
            let is_close = resume_words.iter().any(|word| {
                word.chars().count() > MIN_SUBWORD_LEN
                    && normalized_damerau_levenshtein(keyword, word) > self.fuzzy_threshold
            });
            if is_close {
                return Some(MatchTier::Fuzzy);
            }
        }

        None
    }

    fn multi_word_tier(&self, parts: &[&str], clean_resume: &str) -> Option<MatchTier> {
        let significant: Vec<&str> = parts
            .iter()
            .copied()
            .filter(|p| p.chars().count() > MIN_SUBWORD_LEN)
            .collect();

        let positions: Vec<usize> = significant
            .iter()
            .filter_map(|part| clean_resume.find(part))
            .collect();

        if !significant.is_empty() && positions.len() == significant.len() {
            let span = positions.iter().max().copied().unwrap_or(0)
                - positions.iter().min().copied().unwrap_or(0);
            if span < self.proximity_window {
                return Some(MatchTier::Proximity);
            }
        }

        // two-word keywords are either close together or missing
        if parts.len() < 3 {
            return None;
        }

        let present = significant
            .iter()
            .filter(|part| clean_resume.contains(*part))
            .count();
        if present > 0 && present as f64 >= parts.len() as f64 * PARTIAL_COVERAGE {
            return Some(MatchTier::Partial);
        }

        None
    }

    /// Only the heading line of each section is inspected
    fn context_bonus(&self, lowered_resume: &str, matches: &[KeywordMatch]) -> f64 {
        if matches.is_empty() {
            return 0.0;
        }

        self.context_sections
            .iter()
            .filter_map(|heading| heading.find(lowered_resume))
            .filter(|line| {
                let section_text = line.as_str();
                matches.iter().any(|m| section_text.contains(&m.keyword))
            })
            .count() as f64
            * CONTEXT_BONUS_PER_SECTION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> KeywordMatcher {
        KeywordMatcher::from_config(&Config::default()).unwrap()
    }

    fn keywords(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_keywords_score_zero() {
        let report = matcher().analyze("python developer", &[]);
        assert_eq!(report.score, 0.0);
        assert!(report.matches.is_empty());
    }

    #[test]
    fn test_exact_matches_reach_full_weight() {
        let report = matcher().analyze(
            "Built services in Python and shipped them with Docker.",
            &keywords(&["python", "docker"]),
        );

        assert_eq!(report.matches.len(), 2);
        assert!(report.matches.iter().all(|m| m.tier == MatchTier::Exact));
        assert!((report.matched_weight() - report.total_weight).abs() < 1e-9);
        assert!((report.weighted_score - 1.0).abs() < 1e-9);
        assert_eq!(report.score, 1.0);
    }

    #[test]
    fn test_proximity_match() {
        let report = matcher().analyze(
            "experienced with machine based learning pipelines",
            &keywords(&["machine learning"]),
        );
        assert_eq!(report.matches[0].tier, MatchTier::Proximity);
        assert!((report.matches[0].weight - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_partial_match_when_words_far_apart() {
        let filler = "lorem ipsum dolor sit amet ".repeat(5);
        let text = format!("distributed caching {} systems design", filler);
        let report = matcher().analyze(&text, &keywords(&["distributed systems design"]));
        assert_eq!(report.matches[0].tier, MatchTier::Partial);
    }

    #[test]
    fn test_far_apart_two_word_keyword_is_missing() {
        let text = format!("jane\nmachine {} learning\n", "x".repeat(62));
        let report = matcher().analyze(&text, &keywords(&["machine learning"]));
        assert!(report.matches.is_empty());
        assert_eq!(report.missing, vec!["machine learning".to_string()]);
        assert_eq!(report.score, 0.0);
    }

    #[test]
    fn test_swapped_letters_match_fuzzy() {
        let report = matcher().analyze("i know pyhton and dokcer well", &keywords(&["python", "docker"]));
        assert_eq!(report.matches.len(), 2);
        assert!(report.matches.iter().all(|m| m.tier == MatchTier::Fuzzy));
        assert!(report.score > 0.0);
    }

    #[test]
    fn test_no_matches_give_positive_zero() {
        let report = matcher().analyze("accounting and payroll", &keywords(&["kubernetes"]));
        assert_eq!(report.weighted_score, 0.0);
        assert!(report.weighted_score.is_sign_positive());
    }

    #[test]
    fn test_fuzzy_single_word() {
        let report = matcher().analyze("strong pythong skills", &keywords(&["python"]));
        assert_eq!(report.matches[0].tier, MatchTier::Fuzzy);
        assert!((report.matches[0].weight - 1.5 * 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_short_keywords_skip_fuzzy() {
        let report = matcher().analyze("golang services", &keywords(&["go"]));
        assert!(report.matches.is_empty());
        assert_eq!(report.missing, vec!["go".to_string()]);
        assert_eq!(report.score, 0.0);
    }

    #[test]
    fn test_context_bonus_uses_heading_line() {
        let text = "jane doe\nskills: rust, python\nexperience\nwrote python daily\n";
        let report = matcher().analyze(text, &keywords(&["python", "kotlin"]));
        // only the skills heading line mentions python
        assert!((report.context_bonus - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_score_is_capped() {
        let text = "\nexperience python\nskills python\nprojects python\n";
        let report = matcher().analyze(text, &keywords(&["python"]));
        assert!(report.score <= 1.0);
    }

    #[test]
    fn test_match_result_map() {
        let report = matcher().analyze("python", &keywords(&["Python", "python"]));
        let result = report.match_result();
        assert_eq!(result.len(), 1);
        assert!((result["python"] - 1.5).abs() < 1e-9);
    }
}
