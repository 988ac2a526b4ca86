//! Resume section detection

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionCategory {
    Experience,
    Education,
    Skills,
    Summary,
    Projects,
    Achievements,
}

impl SectionCategory {
    pub const ALL: [SectionCategory; 6] = [
        SectionCategory::Experience,
        SectionCategory::Education,
        SectionCategory::Skills,
        SectionCategory::Summary,
        SectionCategory::Projects,
        SectionCategory::Achievements,
    ];

    /// Contribution of this category to the overall section score; sums to 1.0
    pub fn weight(self) -> f64 {
        match self {
            SectionCategory::Experience => 0.25,
            SectionCategory::Education => 0.20,
            SectionCategory::Skills => 0.20,
            SectionCategory::Summary => 0.15,
            SectionCategory::Projects => 0.10,
            SectionCategory::Achievements => 0.10,
        }
    }

    pub fn synonyms(self) -> &'static [&'static str] {
        match self {
            SectionCategory::Experience => &[
                "experience", "work history", "professional background", "employment",
                "work experience", "career history", "professional experience",
                "employment history", "work background", "professional journey",
            ],
            SectionCategory::Education => &[
                "education", "academic", "qualification", "degree", "university",
                "college", "school", "certification", "academic background",
                "educational background", "academic qualifications", "degrees",
                "certifications", "training", "courses",
            ],
            SectionCategory::Skills => &[
                "skills", "abilities", "competencies", "expertise", "proficiencies",
                "technical skills", "core competencies", "technical expertise",
                "professional skills", "key skills", "skill set", "capabilities",
                "technical proficiencies", "areas of expertise",
            ],
            SectionCategory::Summary => &[
                "summary", "profile", "objective", "about me", "professional summary",
                "career objective", "professional profile", "executive summary",
                "career summary", "personal statement", "professional overview",
                "career profile", "professional statement",
            ],
            SectionCategory::Projects => &[
                "projects", "portfolio", "project experience", "project history",
                "project work", "project portfolio", "project showcase",
                "project achievements", "project highlights", "project details",
            ],
            SectionCategory::Achievements => &[
                "achievements", "accomplishments", "awards", "recognition",
                "honors", "certifications", "professional achievements",
                "key achievements", "notable accomplishments", "awards and recognition",
            ],
        }
    }
}

impl fmt::Display for SectionCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            SectionCategory::Experience => "experience",
            SectionCategory::Education => "education",
            SectionCategory::Skills => "skills",
            SectionCategory::Summary => "summary",
            SectionCategory::Projects => "projects",
            SectionCategory::Achievements => "achievements",
        };
        write!(f, "{}", name)
    }
}

/// How a section was recognized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Detection {
    Header,
    Content,
    Absent,
}

impl Detection {
    pub fn score(self) -> f64 {
        match self {
            Detection::Header => 1.0,
            Detection::Content => 0.7,
            Detection::Absent => 0.0,
        }
    }
}

/// Per-category scores in {0.0, 0.7, 1.0}
pub type SectionScores = BTreeMap<SectionCategory, f64>;

struct SynonymPatterns {
    keyword_len: usize,
    headers: Vec<Regex>,
    content: Regex,
}

pub struct SectionDetector {
    categories: Vec<(SectionCategory, Vec<SynonymPatterns>)>,
}

impl Default for SectionDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionDetector {
    pub fn new() -> Self {
        let categories = SectionCategory::ALL
            .iter()
            .map(|&category| {
                let patterns = category
                    .synonyms()
                    .iter()
                    .map(|keyword| Self::compile(keyword))
                    .collect();
                (category, patterns)
            })
            .collect();

        Self { categories }
    }

    fn compile(keyword: &str) -> SynonymPatterns {
        let kw = regex::escape(keyword);
        let header_sources = [
            // "Skills:"
            format!(r"(?i)\b({kw})\s*:"),
            // heading alone on its line
            format!(r"(?i)\n\s*({kw})\s*\n"),
            // heading followed by a bulleted line
            format!(r"(?i)\n\s*({kw})\s*[^\n]*\n\s*[-•\*]"),
            // heading followed by a capitalized line
            format!(r"(?i)\n\s*({kw})\s*[^\n]*\n\s*[A-Z]"),
            // heading followed by a numbered line
            format!(r"(?i)\n\s*({kw})\s*[^\n]*\n\s*\d+\."),
        ];

        SynonymPatterns {
            keyword_len: keyword.chars().count(),
            headers: header_sources
                .iter()
                .map(|source| Regex::new(source).expect("Invalid section header regex"))
                .collect(),
            content: Regex::new(&format!(r"(?i)\n.*?{kw}.*?\n")).expect("Invalid section content regex"),
        }
    }

    /// Classify each category; header detection wins over content detection
    pub fn detect(&self, text: &str) -> BTreeMap<SectionCategory, Detection> {
        let lowered = text.to_lowercase();

        self.categories
            .iter()
            .map(|(category, patterns)| {
                let header = patterns
                    .iter()
                    .any(|p| p.headers.iter().any(|re| re.is_match(&lowered)));

                let detection = if header {
                    Detection::Header
                } else if category
                    .synonyms()
                    .iter()
                    .zip(patterns)
                    .any(|(keyword, p)| Self::has_content_match(&lowered, keyword, p))
                {
                    Detection::Content
                } else {
                    Detection::Absent
                };

                (*category, detection)
            })
            .collect()
    }

    /// The keyword must sit inside a line with more than the keyword itself on it
    fn has_content_match(text: &str, keyword: &str, patterns: &SynonymPatterns) -> bool {
        if !text.contains(keyword) {
            return false;
        }
        patterns
            .content
            .find(text)
            .is_some_and(|m| m.as_str().trim().chars().count() > patterns.keyword_len + 5)
    }

    pub fn section_scores(&self, text: &str) -> SectionScores {
        self.detect(text)
            .into_iter()
            .map(|(category, detection)| (category, detection.score()))
            .collect()
    }

    /// Weighted section score in [0, 1]
    pub fn score(&self, text: &str) -> f64 {
        let total: f64 = self
            .section_scores(text)
            .iter()
            .map(|(category, score)| score * category.weight())
            .sum();
        total.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        let sum: f64 = SectionCategory::ALL.iter().map(|c| c.weight()).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_colon_header_is_detected() {
        let detector = SectionDetector::new();
        let detections = detector.detect("Experience:\n- Built systems");
        assert_eq!(detections[&SectionCategory::Experience], Detection::Header);
        assert_eq!(detector.section_scores("Experience:\n- Built systems")[&SectionCategory::Experience], 1.0);
    }

    #[test]
    fn test_standalone_header_line() {
        let detector = SectionDetector::new();
        let text = "jane doe\nprojects\n\n";
        assert_eq!(detector.detect(text)[&SectionCategory::Projects], Detection::Header);
    }

    #[test]
    fn test_prose_mention_scores_at_most_content() {
        let detector = SectionDetector::new();
        let single_line = "I gained experience over the years";
        assert!(detector.section_scores(single_line)[&SectionCategory::Experience] <= 0.7);

        let wrapped = "jane doe\nI gained experience over the years\n";
        assert_eq!(detector.detect(wrapped)[&SectionCategory::Experience], Detection::Content);
        assert_eq!(detector.section_scores(wrapped)[&SectionCategory::Experience], 0.7);
    }

    #[test]
    fn test_missing_sections_score_zero() {
        let detector = SectionDetector::new();
        let scores = detector.section_scores("hello there");
        assert!(scores.values().all(|&s| s == 0.0));
        assert_eq!(detector.score("hello there"), 0.0);
    }

    #[test]
    fn test_full_resume_scores_one() {
        let detector = SectionDetector::new();
        let text = "Summary:\nEngineer\nExperience:\n- Acme\nEducation:\nBSc\n\
                    Skills:\nRust\nProjects:\n- Tool\nAchievements:\n- Award\n";
        assert!((detector.score(text) - 1.0).abs() < 1e-9);
    }
}
