//! Strengths, weaknesses and improvement suggestions from resume/job facts

use crate::config::Config;
use crate::error::{AtsScorerError, Result};
use crate::processing::formatting::FormattingAnalyzer;
use crate::processing::text::normalize_unicode;
use crate::processing::vocabulary::TermSet;
use chrono::Datelike;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Degree levels, ordered so a higher degree satisfies a lower requirement
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EducationLevel {
    Associate,
    Bachelor,
    Master,
    Doctorate,
}

impl EducationLevel {
    pub const ALL: [EducationLevel; 4] = [
        EducationLevel::Associate,
        EducationLevel::Bachelor,
        EducationLevel::Master,
        EducationLevel::Doctorate,
    ];

    /// Case-folded pattern; trailing `(?:[^a-z]|$)` keeps "mastered" and "bash" out
    fn pattern(self) -> &'static str {
        match self {
            EducationLevel::Associate => r"\b(?:associate'?s? degree|associate of)(?:[^a-z]|$)",
            EducationLevel::Bachelor => {
                r"\b(?:bachelor'?s?|bachelors|bsc|b\.sc|b\.s\.|bs|b\.a\.|ba|beng|b\.eng|btech|b\.tech)(?:[^a-z]|$)"
            }
            EducationLevel::Master => {
                r"\b(?:master'?s|master of|msc|m\.sc|m\.s\.|mba|meng|m\.eng)(?:[^a-z]|$)"
            }
            EducationLevel::Doctorate => r"\b(?:phd|ph\.d|doctorate|doctoral)(?:[^a-z]|$)",
        }
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EducationLevel::Associate => "associate's degree",
            EducationLevel::Bachelor => "bachelor's degree",
            EducationLevel::Master => "master's degree",
            EducationLevel::Doctorate => "doctorate",
        };
        write!(f, "{}", label)
    }
}

/// Facts compared to produce insights
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightFacts {
    pub required_skills: Vec<String>,
    pub resume_skills: Vec<String>,
    /// None when the job description states no experience requirement
    pub required_years: Option<u32>,
    pub resume_years: u32,
    /// Every level the job description mentions, lowest first
    pub required_education: Vec<EducationLevel>,
    /// Highest level found in the resume
    pub resume_education: Option<EducationLevel>,
    pub well_formatted: bool,
}

impl InsightFacts {
    pub fn matching_skills(&self) -> Vec<String> {
        self.required_skills
            .iter()
            .filter(|skill| self.resume_skills.contains(skill))
            .cloned()
            .collect()
    }

    pub fn missing_skills(&self) -> Vec<String> {
        self.required_skills
            .iter()
            .filter(|skill| !self.resume_skills.contains(skill))
            .cloned()
            .collect()
    }

    pub fn meets_experience(&self) -> Option<bool> {
        self.required_years.map(|required| self.resume_years >= required)
    }

    pub fn meets_education(&self) -> Option<bool> {
        let required = self.required_education.first()?;
        Some(self.resume_education.is_some_and(|held| held >= *required))
    }

    fn required_education_label(&self) -> String {
        self.required_education
            .iter()
            .map(|level| level.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub improvements: Vec<String>,
}

pub struct InsightGenerator {
    skills: TermSet,
    education: Vec<(EducationLevel, Regex)>,
    years: Regex,
    date_range: Regex,
    formatting: FormattingAnalyzer,
    well_formatted_threshold: f64,
}

impl InsightGenerator {
    pub fn from_config(config: &Config) -> Result<Self> {
        let education = EducationLevel::ALL
            .iter()
            .map(|level| {
                Regex::new(level.pattern())
                    .map(|re| (*level, re))
                    .map_err(|e| AtsScorerError::Configuration(format!("Invalid education pattern: {}", e)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            skills: TermSet::new(&config.vocabulary.skills)?,
            education,
            // "5 years", "5+ years", "3-5 years", "3 to 5 yrs"; group 1 is the lower bound
            years: Regex::new(r"\b(\d+)\s*(?:\+|(?:-|to)\s*\d+)?\s*\+?\s*(?:years?|yrs?)\b")
                .expect("Invalid years regex"),
            date_range: Regex::new(r"\b((?:19|20)\d{2})\s*(?:-|to)\s*((?:19|20)\d{2}|present|current|now)\b")
                .expect("Invalid date range regex"),
            formatting: FormattingAnalyzer::new(),
            well_formatted_threshold: config.scoring.well_formatted_threshold,
        })
    }

    /// Extract the facts behind every insight; fails on empty input or unreadable numbers
    pub fn derive_facts(&self, resume_text: &str, job_description: &str) -> Result<InsightFacts> {
        if resume_text.trim().is_empty() {
            return Err(AtsScorerError::Extraction("resume text is empty".to_string()));
        }
        if job_description.trim().is_empty() {
            return Err(AtsScorerError::Extraction("job description is empty".to_string()));
        }

        let resume = normalize_unicode(resume_text).to_lowercase();
        let job = normalize_unicode(job_description).to_lowercase();

        let mut required_education = self.education_levels(&job);
        required_education.sort();

        Ok(InsightFacts {
            required_skills: self.skills.find_terms(&job),
            resume_skills: self.skills.find_terms(&resume),
            required_years: self.max_stated_years(&job)?,
            resume_years: self.experience_years(&resume)?,
            required_education,
            resume_education: self.education_levels(&resume).into_iter().max(),
            well_formatted: self.formatting.score(resume_text) >= self.well_formatted_threshold,
        })
    }

    pub fn identify_strengths(&self, resume_text: &str, job_description: &str) -> Vec<String> {
        match self.derive_facts(resume_text, job_description) {
            Ok(facts) => strengths(&facts),
            Err(e) => {
                log::error!("Error identifying strengths: {}", e);
                Vec::new()
            }
        }
    }

    pub fn identify_weaknesses(&self, resume_text: &str, job_description: &str) -> Vec<String> {
        match self.derive_facts(resume_text, job_description) {
            Ok(facts) => weaknesses(&facts),
            Err(e) => {
                log::error!("Error identifying weaknesses: {}", e);
                Vec::new()
            }
        }
    }

    pub fn suggest_improvements(&self, resume_text: &str, job_description: &str) -> Vec<String> {
        match self.derive_facts(resume_text, job_description) {
            Ok(facts) => improvements(&facts),
            Err(e) => {
                log::error!("Error suggesting improvements: {}", e);
                Vec::new()
            }
        }
    }

    /// All three lists from a single fact extraction
    pub fn generate(&self, resume_text: &str, job_description: &str) -> Insights {
        match self.derive_facts(resume_text, job_description) {
            Ok(facts) => Insights {
                strengths: strengths(&facts),
                weaknesses: weaknesses(&facts),
                improvements: improvements(&facts),
            },
            Err(e) => {
                log::error!("Error generating insights: {}", e);
                Insights::default()
            }
        }
    }

    fn education_levels(&self, text: &str) -> Vec<EducationLevel> {
        self.education
            .iter()
            .filter(|(_, re)| re.is_match(text))
            .map(|(level, _)| *level)
            .collect()
    }

    fn max_stated_years(&self, text: &str) -> Result<Option<u32>> {
        let mut max: Option<u32> = None;
        for caps in self.years.captures_iter(text) {
            let years = parse_count(&caps[1])?;
            max = Some(max.map_or(years, |m| m.max(years)));
        }
        Ok(max)
    }

    /// Larger of the stated years and the span covered by date ranges
    fn experience_years(&self, resume: &str) -> Result<u32> {
        let stated = self.max_stated_years(resume)?.unwrap_or(0);

        let current_year = u32::try_from(chrono::Local::now().year())
            .map_err(|_| AtsScorerError::Extraction("current year out of range".to_string()))?;

        let mut earliest: Option<u32> = None;
        let mut latest: Option<u32> = None;
        for caps in self.date_range.captures_iter(resume) {
            let start = parse_count(&caps[1])?;
            let end = match &caps[2] {
                "present" | "current" | "now" => current_year,
                year => parse_count(year)?,
            };
            if end < start {
                continue;
            }
            earliest = Some(earliest.map_or(start, |e| e.min(start)));
            latest = Some(latest.map_or(end, |l| l.max(end)));
        }

        let spanned = match (earliest, latest) {
            (Some(start), Some(end)) => end - start,
            _ => 0,
        };

        Ok(stated.max(spanned))
    }
}

fn parse_count(digits: &str) -> Result<u32> {
    digits
        .parse::<u32>()
        .map_err(|e| AtsScorerError::Extraction(format!("unreadable year count '{}': {}", digits, e)))
}

fn strengths(facts: &InsightFacts) -> Vec<String> {
    let mut strengths = Vec::new();

    let matching = facts.matching_skills();
    if !matching.is_empty() {
        strengths.push(format!("Strong match with required skills: {}", matching.join(", ")));
    }

    if let (Some(true), Some(required)) = (facts.meets_experience(), facts.required_years) {
        strengths.push(format!("Meets or exceeds required experience level ({} years)", required));
    }

    if facts.meets_education() == Some(true) {
        strengths.push("Meets education requirements".to_string());
    }

    if facts.well_formatted {
        strengths.push("Well-formatted resume with clear sections".to_string());
    }

    strengths
}

fn weaknesses(facts: &InsightFacts) -> Vec<String> {
    let mut weaknesses = Vec::new();

    let missing = facts.missing_skills();
    if !missing.is_empty() {
        weaknesses.push(format!("Missing required skills: {}", missing.join(", ")));
    }

    if let (Some(false), Some(required)) = (facts.meets_experience(), facts.required_years) {
        weaknesses.push(format!("Below required experience level ({} years)", required));
    }

    if facts.meets_education() == Some(false) {
        weaknesses.push("Does not meet education requirements".to_string());
    }

    if !facts.well_formatted {
        weaknesses.push("Resume format could be improved".to_string());
    }

    weaknesses
}

fn improvements(facts: &InsightFacts) -> Vec<String> {
    let mut improvements = Vec::new();

    let missing = facts.missing_skills();
    if !missing.is_empty() {
        improvements.push(format!("Add missing required skills: {}", missing.join(", ")));
    }

    if let (Some(false), Some(required)) = (facts.meets_experience(), facts.required_years) {
        improvements.push(format!(
            "Highlight relevant experience to meet {} years requirement",
            required
        ));
    }

    if facts.meets_education() == Some(false) {
        improvements.push(format!(
            "Consider adding {} education",
            facts.required_education_label()
        ));
    }

    if !facts.well_formatted {
        improvements.push("Improve resume formatting with clear sections and bullet points".to_string());
    }

    improvements
}

fn default_generator() -> Option<&'static InsightGenerator> {
    static GENERATOR: OnceLock<Option<InsightGenerator>> = OnceLock::new();
    GENERATOR
        .get_or_init(|| match InsightGenerator::from_config(&Config::default()) {
            Ok(generator) => Some(generator),
            Err(e) => {
                log::error!("Failed to build insight generator: {}", e);
                None
            }
        })
        .as_ref()
}

/// Resume qualities that match the job; never fails, empty on bad input
pub fn identify_strengths(resume_text: &str, job_description: &str) -> Vec<String> {
    default_generator()
        .map(|g| g.identify_strengths(resume_text, job_description))
        .unwrap_or_default()
}

pub fn identify_weaknesses(resume_text: &str, job_description: &str) -> Vec<String> {
    default_generator()
        .map(|g| g.identify_weaknesses(resume_text, job_description))
        .unwrap_or_default()
}

pub fn suggest_improvements(resume_text: &str, job_description: &str) -> Vec<String> {
    default_generator()
        .map(|g| g.suggest_improvements(resume_text, job_description))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const JOB: &str = "Senior Backend Engineer\n\
        We need 5+ years of experience building services in Python and Go.\n\
        Familiarity with Docker and Kubernetes. Bachelor's degree in Computer Science or related field.";

    const STRONG_RESUME: &str = "Jane Doe\n\
        jane@example.com | 555-123-4567 | github.com/janedoe\n\
        SUMMARY\n\
        Backend engineer with 7 years of experience.\n\
        EXPERIENCE:\n\
        - Built Python and Go services at Acme, Jan 2017 - Present\n\
        - Ran Docker and Kubernetes clusters\n\
        - Led on-call rotation\n\
        - Mentored engineers\n\
        - Cut cloud spend\n\
        SKILLS:\n\
        - Python, Go, Docker, Kubernetes\n\
        EDUCATION:\n\
        M.Sc. Computer Science\n";

    const WEAK_RESUME: &str = "john smith. i have 2 years doing python scripts and some excel work.";

    fn generator() -> InsightGenerator {
        InsightGenerator::from_config(&Config::default()).unwrap()
    }

    #[test]
    fn test_derive_facts() {
        let facts = generator().derive_facts(STRONG_RESUME, JOB).unwrap();
        assert_eq!(facts.required_skills, vec!["python", "go", "docker", "kubernetes"]);
        assert_eq!(facts.required_years, Some(5));
        assert!(facts.resume_years >= 7);
        assert_eq!(facts.required_education, vec![EducationLevel::Bachelor]);
        assert_eq!(facts.resume_education, Some(EducationLevel::Master));
        assert!(facts.well_formatted);
    }

    #[test]
    fn test_strong_resume_strengths() {
        let insights = generator().generate(STRONG_RESUME, JOB);
        assert_eq!(
            insights.strengths,
            vec![
                "Strong match with required skills: python, go, docker, kubernetes".to_string(),
                "Meets or exceeds required experience level (5 years)".to_string(),
                "Meets education requirements".to_string(),
                "Well-formatted resume with clear sections".to_string(),
            ]
        );
        assert!(insights.weaknesses.is_empty());
        assert!(insights.improvements.is_empty());
    }

    #[test]
    fn test_weak_resume_weaknesses_and_improvements() {
        let generator = generator();
        let weaknesses = generator.identify_weaknesses(WEAK_RESUME, JOB);
        assert_eq!(
            weaknesses,
            vec![
                "Missing required skills: go, docker, kubernetes".to_string(),
                "Below required experience level (5 years)".to_string(),
                "Does not meet education requirements".to_string(),
                "Resume format could be improved".to_string(),
            ]
        );

        let improvements = generator.suggest_improvements(WEAK_RESUME, JOB);
        assert_eq!(
            improvements,
            vec![
                "Add missing required skills: go, docker, kubernetes".to_string(),
                "Highlight relevant experience to meet 5 years requirement".to_string(),
                "Consider adding bachelor's degree education".to_string(),
                "Improve resume formatting with clear sections and bullet points".to_string(),
            ]
        );

        let strengths = generator.identify_strengths(WEAK_RESUME, JOB);
        assert_eq!(strengths, vec!["Strong match with required skills: python".to_string()]);
    }

    #[test]
    fn test_date_ranges_count_as_experience() {
        let facts = generator()
            .derive_facts("Acme 2010 - 2014\nGlobex 2014 to 2020\n", "10 years required")
            .unwrap();
        assert_eq!(facts.resume_years, 10);
        assert_eq!(facts.meets_experience(), Some(true));
    }

    #[test]
    fn test_year_ranges_use_lower_bound() {
        let facts = generator().derive_facts("resume", "3-5 years of experience").unwrap();
        assert_eq!(facts.required_years, Some(3));
    }

    #[test]
    fn test_no_requirements_means_no_experience_or_education_insight() {
        let strengths = identify_strengths(STRONG_RESUME, "Looking for a friendly teammate.");
        assert_eq!(strengths, vec!["Well-formatted resume with clear sections".to_string()]);
    }

    #[test]
    fn test_empty_or_malformed_input_yields_empty_lists() {
        assert!(identify_strengths("", JOB).is_empty());
        assert!(identify_weaknesses(STRONG_RESUME, "   ").is_empty());
        assert!(suggest_improvements("", "").is_empty());

        // a year count that overflows u32 is an extraction failure
        let huge = "99999999999999999999 years of experience";
        assert!(identify_weaknesses(huge, JOB).is_empty());
        assert!(generator().derive_facts(huge, JOB).is_err());
    }

    #[test]
    fn test_education_patterns() {
        let generator = generator();
        assert_eq!(generator.education_levels("phd in physics"), vec![EducationLevel::Doctorate]);
        assert_eq!(generator.education_levels("b.s. in math"), vec![EducationLevel::Bachelor]);
        assert!(generator.education_levels("mastered bash scripting as scrum master").is_empty());
        assert!(EducationLevel::Doctorate > EducationLevel::Bachelor);
    }
}
