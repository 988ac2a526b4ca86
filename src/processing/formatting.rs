//! Layout heuristics: bullets, headings, dates and contact details

use regex::Regex;
use serde::{Deserialize, Serialize};

const MAX_DATE_SCORE: f64 = 0.15;
const DATE_STYLE_SCORE: f64 = 0.05;
const MAX_CONTACT_SCORE: f64 = 0.15;
const CONTACT_SCORE: f64 = 0.05;

/// Raw counts behind a formatting score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormattingSignals {
    pub bullet_count: usize,
    pub header_count: usize,
    pub date_styles: usize,
    pub contact_patterns: usize,
}

impl FormattingSignals {
    pub fn score(&self) -> f64 {
        let bullets = match self.bullet_count {
            n if n >= 10 => 0.35,
            n if n >= 5 => 0.25,
            n if n > 0 => 0.15,
            _ => 0.0,
        };

        let headers = match self.header_count {
            n if n >= 5 => 0.35,
            n if n >= 3 => 0.25,
            n if n > 0 => 0.15,
            _ => 0.0,
        };

        let dates = (self.date_styles as f64 * DATE_STYLE_SCORE).min(MAX_DATE_SCORE);
        let contact = (self.contact_patterns as f64 * CONTACT_SCORE).min(MAX_CONTACT_SCORE);

        (bullets + headers + dates + contact).min(1.0)
    }
}

/// Scores the visual structure of case-preserved resume text
pub struct FormattingAnalyzer {
    numbered_line: Regex,
    header_patterns: Vec<Regex>,
    date_patterns: Vec<Regex>,
    contact_patterns: Vec<Regex>,
}

impl Default for FormattingAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl FormattingAnalyzer {
    pub fn new() -> Self {
        let compile = |sources: &[&str]| -> Vec<Regex> {
            sources
                .iter()
                .map(|s| Regex::new(s).expect("Invalid formatting regex"))
                .collect()
        };

        Self {
            numbered_line: Regex::new(r"\n\s*\d+\.").expect("Invalid numbered list regex"),
            header_patterns: compile(&[
                // ALL CAPS heading with colon
                r"\n[A-Z][A-Z\s]+:",
                // ALL CAPS heading on its own line
                r"\n[A-Z][A-Z\s]+\n",
                // Title Case "Work History:"
                r"\n[A-Z][a-z]+\s[A-Z][a-z]+:",
                // numbered heading
                r"\n\s*\d+\.\s*[A-Z][a-z]+",
            ]),
            date_patterns: compile(&[
                r"\b(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)[a-z]* \d{4}\b",
                r"\b\d{2}/\d{2}/\d{4}\b",
                r"\b\d{4}-\d{2}-\d{2}\b",
                r"\b\d{4}\s*-\s*(?:Present|Current|Now)\b",
            ]),
            contact_patterns: compile(&[
                // email
                r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}\b",
                // phone
                r"\b(?:\+\d{1,3}\s?)?(?:\(\d{3}\)|\d{3})[-.\s]?\d{3}[-.\s]?\d{4}\b",
                r"linkedin\.com/in/[a-zA-Z0-9_-]+",
                r"github\.com/[a-zA-Z0-9_-]+",
            ]),
        }
    }

    pub fn signals(&self, text: &str) -> FormattingSignals {
        let bullet_count = text.matches('•').count()
            + text.matches("- ").count()
            + text.matches("* ").count()
            + self.numbered_line.find_iter(text).count();

        let header_count = self
            .header_patterns
            .iter()
            .map(|re| re.find_iter(text).count())
            .sum();

        let date_styles = self.date_patterns.iter().filter(|re| re.is_match(text)).count();
        let contact_patterns = self.contact_patterns.iter().filter(|re| re.is_match(text)).count();

        FormattingSignals {
            bullet_count,
            header_count,
            date_styles,
            contact_patterns,
        }
    }

    /// Formatting score in [0, 1]
    pub fn score(&self, text: &str) -> f64 {
        self.signals(text).score()
    }
}
