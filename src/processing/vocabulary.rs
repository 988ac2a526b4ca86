//! Term vocabularies used for keyword importance and skill extraction

use crate::config::VocabularyConfig;
use crate::error::{AtsScorerError, Result};
use aho_corasick::{AhoCorasick, MatchKind};
use std::collections::HashSet;

/// Case-insensitive multi-pattern term set
pub struct TermSet {
    terms: Vec<String>,
    matcher: AhoCorasick,
}

impl TermSet {
    pub fn new(terms: &[String]) -> Result<Self> {
        let mut terms: Vec<String> = terms
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        terms.sort();
        terms.dedup();
        // Longest first so overlapping terms prefer the more specific one
        terms.sort_by(|a, b| b.len().cmp(&a.len()));

        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::LeftmostLongest)
            .build(&terms)
            .map_err(|e| AtsScorerError::Configuration(format!("Failed to build term matcher: {}", e)))?;

        Ok(Self { terms, matcher })
    }

    /// True if any term occurs anywhere in `text`, including inside other words
    pub fn is_match(&self, text: &str) -> bool {
        self.matcher.is_match(text)
    }

    /// Terms occurring in `text` as standalone tokens, in first-appearance order
    pub fn find_terms(&self, text: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut found = Vec::new();

        for mat in self.matcher.find_iter(text) {
            if !is_token_boundary(text, mat.start(), mat.end()) {
                continue;
            }
            let term = &self.terms[mat.pattern().as_usize()];
            if seen.insert(term.as_str()) {
                found.push(term.clone());
            }
        }

        found
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

fn is_token_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(|c| c.is_alphanumeric()) && !after.is_some_and(|c| c.is_alphanumeric())
}

/// Vocabularies that raise a keyword's importance weight
pub struct ImportanceVocabulary {
    technical: TermSet,
    framework: TermSet,
    cloud: TermSet,
}

impl ImportanceVocabulary {
    pub const BASE_WEIGHT: f64 = 1.0;
    pub const TECHNICAL_BONUS: f64 = 0.5;
    pub const FRAMEWORK_BONUS: f64 = 0.3;
    pub const CLOUD_BONUS: f64 = 0.4;

    pub fn from_config(config: &VocabularyConfig) -> Result<Self> {
        Ok(Self {
            technical: TermSet::new(&config.technical)?,
            framework: TermSet::new(&config.framework)?,
            cloud: TermSet::new(&config.cloud)?,
        })
    }

    /// Additive weight: a keyword can belong to several categories at once
    pub fn importance_weight(&self, keyword: &str) -> f64 {
        let mut weight = Self::BASE_WEIGHT;
        if self.technical.is_match(keyword) {
            weight += Self::TECHNICAL_BONUS;
        }
        if self.framework.is_match(keyword) {
            weight += Self::FRAMEWORK_BONUS;
        }
        if self.cloud.is_match(keyword) {
            weight += Self::CLOUD_BONUS;
        }
        weight
    }
}
