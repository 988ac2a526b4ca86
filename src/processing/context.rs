//! Keyword relevance within the resume's main sections

use crate::processing::text::section_line_regex;
use regex::Regex;

/// Section name fragments and their share of the context score
const SECTION_WEIGHTS: [(&str, f64); 4] = [
    ("experience", 0.4),
    ("project", 0.2),
    ("skill", 0.4),
    ("education", 0.2),
];

pub struct ContextAnalyzer {
    sections: Vec<(Regex, f64)>,
    next_heading: Regex,
}

impl Default for ContextAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextAnalyzer {
    pub fn new() -> Self {
        Self {
            sections: SECTION_WEIGHTS
                .iter()
                .map(|(name, weight)| (section_line_regex(name), *weight))
                .collect(),
            // a newline followed by a run of letters ending in a colon or the end of text
            next_heading: Regex::new(r"(?i)\n\s*[A-Z][A-Z\s]+\s*(?::|$)")
                .expect("Invalid heading regex"),
        }
    }

    /// Approximate section body: from the heading line up to the next heading-shaped run
    fn section_span<'a>(&self, text: &'a str, heading: &Regex) -> Option<&'a str> {
        let start = heading.find(text)?.start();
        // `start` is the newline that opens the heading line
        let rest = &text[start + 1..];
        let end = match self.next_heading.find(rest) {
            Some(m) => start + 1 + m.start(),
            None => text.len(),
        };
        Some(&text[start..end])
    }

    /// Context-relevance score in [0, 1]; sections not found contribute nothing
    pub fn score(&self, resume_text: &str, keywords: &[String]) -> f64 {
        let keywords: Vec<String> = keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        if keywords.is_empty() {
            return 0.0;
        }

        let lowered = resume_text.to_lowercase();
        let total = keywords.len() as f64;

        let score: f64 = self
            .sections
            .iter()
            .filter_map(|(heading, weight)| {
                let span = self.section_span(&lowered, heading)?;
                let found = keywords.iter().filter(|k| span.contains(k.as_str())).count();
                Some(found as f64 / total * weight)
            })
            .fold(0.0, |acc, part| acc + part);

        score.min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_experience_span_stops_at_next_heading() {
        let analyzer = ContextAnalyzer::new();
        let text = "jane doe\nexperience\n- shipped python and docker services\nskills: go\n";
        let score = analyzer.score(text, &keywords(&["python", "docker"]));
        assert!((score - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_keywords_split_across_sections() {
        let analyzer = ContextAnalyzer::new();
        let text = "jane doe\nexperience\n- built python services\nskills: docker, kubernetes\n";
        let score = analyzer.score(text, &keywords(&["python", "docker"]));
        // experience holds python (0.5 * 0.4), skills holds docker (0.5 * 0.4)
        assert!((score - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_empty_keywords_or_sections() {
        let analyzer = ContextAnalyzer::new();
        assert_eq!(analyzer.score("\nexperience\npython\n", &[]), 0.0);
        assert_eq!(analyzer.score("python docker", &keywords(&["python"])), 0.0);
    }

    #[test]
    fn test_missing_sections_score_positive_zero() {
        let analyzer = ContextAnalyzer::new();
        let score = analyzer.score("python docker", &keywords(&["python"]));
        assert!(score.is_sign_positive());
    }

    #[test]
    fn test_score_is_capped() {
        let analyzer = ContextAnalyzer::new();
        let text = "x\nexperience python\nproject python\nskill python\neducation python\n";
        let score = analyzer.score(text, &keywords(&["python"]));
        assert!(score <= 1.0);
        assert!(score > 0.0);
    }
}
