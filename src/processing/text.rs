//! Text normalization, tokenization and section-window helpers

use regex::Regex;
use std::collections::{HashMap, HashSet};
use unicode_segmentation::UnicodeSegmentation;

pub struct TextProcessor {
    stop_words: HashSet<String>,
    punctuation_regex: Regex,
    whitespace_regex: Regex,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        let punctuation_regex = Regex::new(r"[.,;:!?()\[\]{}]")
            .expect("Invalid punctuation regex");

        let whitespace_regex = Regex::new(r"\s+")
            .expect("Invalid whitespace regex");

        Self {
            stop_words: Self::create_stop_words(),
            punctuation_regex,
            whitespace_regex,
        }
    }

    /// Replace sentence punctuation and brackets with spaces, then collapse whitespace
    pub fn clean_for_matching(&self, text: &str) -> String {
        let spaced = self.punctuation_regex.replace_all(text, " ");
        self.whitespace_regex.replace_all(&spaced, " ").trim().to_string()
    }

    /// Tokenize into lower-cased unicode words, dropping stop words and single characters
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();

        for word in normalize_unicode(text).unicode_words() {
            let normalized = word.to_lowercase();

            if !self.stop_words.contains(&normalized) && normalized.chars().count() > 1 {
                if normalized.chars().any(|c| c.is_alphabetic()) {
                    tokens.push(normalized);
                }
            }
        }

        tokens
    }

    /// Most frequent non-stop-word terms; ties keep first-appearance order
    pub fn extract_keywords(&self, text: &str, max_keywords: usize) -> Vec<String> {
        let mut word_freq: HashMap<String, usize> = HashMap::new();
        let mut order = Vec::new();

        for token in self.tokenize(text) {
            if token.chars().count() <= 2 {
                continue;
            }
            let count = word_freq.entry(token.clone()).or_insert(0);
            if *count == 0 {
                order.push(token);
            }
            *count += 1;
        }

        // stable sort keeps first appearance for equal counts
        order.sort_by(|a, b| word_freq[b].cmp(&word_freq[a]));
        order.truncate(max_keywords);
        order
    }

    fn create_stop_words() -> HashSet<String> {
        let stop_words = [
            "a", "an", "and", "are", "as", "at", "be", "by", "for", "from",
            "has", "he", "in", "is", "it", "its", "of", "on", "that", "the",
            "to", "was", "will", "with", "this", "but", "they", "have",
            "had", "what", "each", "which", "she", "do", "how", "their",
            "if", "up", "out", "many", "then", "them", "these", "so", "some",
            "her", "would", "make", "like", "into", "him", "more", "no",
            "could", "my", "than", "been", "who", "now", "did", "get",
            "may", "over", "new", "only", "our", "just", "also", "any",
            "such", "must", "should", "can", "you", "your", "we", "us",
            "or", "not", "all", "about", "other", "well", "within", "while",
            "across", "including", "strong", "ability", "able", "work",
            "working", "role", "team", "join", "looking", "ideal", "candidate",
            "plus", "preferred", "required", "requirements", "responsibilities",
            "experience", "years", "year", "using", "etc",
        ];

        stop_words.iter().map(|&s| s.to_string()).collect()
    }
}

/// Lower-cased whitespace-delimited words, deduplicated in first-appearance order
pub fn unique_words(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut seen = HashSet::new();
    let words = lowered
        .split_whitespace()
        .filter(|w| seen.insert(*w))
        .map(|w| w.to_string())
        .collect();
    words
}

/// First line that starts (after a newline) with `section`, case-insensitively.
///
/// Only the heading line itself is covered; callers wanting a wider window
/// extend from the match start.
pub fn section_line_regex(section: &str) -> Regex {
    let pattern = format!(r"(?i)\n\s*{}.*?\n", regex::escape(section));
    Regex::new(&pattern).expect("Invalid section line regex")
}

/// Fold typographic punctuation into ASCII
pub fn normalize_unicode(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2013}' | '\u{2014}' => '-',
            '\u{2026}' => '.',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_for_matching() {
        let processor = TextProcessor::new();
        let cleaned = processor.clean_for_matching("Skills: Python, Docker (AWS)!\n\n  [Kubernetes]");
        assert_eq!(cleaned, "Skills Python Docker AWS Kubernetes");
    }

    #[test]
    fn test_tokenization() {
        let processor = TextProcessor::new();
        let tokens = processor.tokenize("Rust programming language is awesome!");

        assert!(tokens.contains(&"rust".to_string()));
        assert!(tokens.contains(&"programming".to_string()));
        assert!(!tokens.contains(&"is".to_string()));
    }

    #[test]
    fn test_keyword_extraction() {
        let processor = TextProcessor::new();
        let text = "Rust Rust programming language. Rust is memory safe. Programming with Rust is fun.";

        let keywords = processor.extract_keywords(text, 3);

        assert_eq!(keywords, vec!["rust", "programming", "language"]);
    }

    #[test]
    fn test_unique_words_keeps_order() {
        assert_eq!(unique_words("Python python Docker  python"), vec!["python", "docker"]);
    }

    #[test]
    fn test_section_line_regex() {
        let text = "header\n  Experience at Acme\nbuilt things\n";
        let found = section_line_regex("experience").find(text).unwrap();
        assert_eq!(found.as_str(), "\n  Experience at Acme\n");

        assert!(section_line_regex("experience").find("experience only").is_none());
    }

    #[test]
    fn test_normalize_unicode() {
        assert_eq!(normalize_unicode("2019 \u{2013} 2021 \u{201C}ok\u{201D}"), "2019 - 2021 \"ok\"");
    }
}
