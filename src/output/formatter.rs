//! Output formatters: colored console, JSON and Markdown

use crate::config::OutputFormat;
use crate::error::{AtsScorerError, Result};
use crate::output::report::{ReportKind, ScoreReport};
use crate::processing::aggregator::HeuristicBreakdown;
use crate::processing::keywords::MatchTier;
use crate::processing::result::AnalysisResult;
use colored::{Color, Colorize};
use std::path::Path;

/// Trait for rendering score reports
pub trait OutputFormatter {
    fn format_report(&self, report: &ScoreReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

/// JSON formatter for scripting and integration
pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Report generator that coordinates the formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

fn tier_label(tier: MatchTier) -> &'static str {
    match tier {
        MatchTier::Exact => "exact",
        MatchTier::Proximity => "proximity",
        MatchTier::Partial => "partial",
        MatchTier::Fuzzy => "fuzzy",
    }
}

fn percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            _ => "▒",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            _ => Color::Yellow,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: f64) -> String {
        let (badge, color) = match score {
            s if s >= 80.0 => ("STRONG", Color::Green),
            s if s >= 60.0 => ("GOOD", Color::Yellow),
            s if s >= 40.0 => ("FAIR", Color::BrightYellow),
            _ => ("WEAK", Color::Red),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_list(&self, output: &mut String, title: &str, items: &[String], color: Color) {
        if items.is_empty() {
            return;
        }
        output.push_str(&self.format_header(title, 3));
        for item in items {
            output.push_str(&format!("  • {}\n", self.colorize(item, color)));
        }
    }

    fn format_heuristic(&self, output: &mut String, keywords: &[String], breakdown: &HeuristicBreakdown) {
        output.push_str(&self.format_header("Score Breakdown", 2));
        output.push_str(&format!("Sections:   {}\n", percent(breakdown.section_score)));
        output.push_str(&format!("Keywords:   {}\n", percent(breakdown.keyword_score)));
        output.push_str(&format!("Formatting: {}\n", percent(breakdown.format_score)));
        output.push_str(&format!("Context:    {}\n", percent(breakdown.context_score)));

        if self.detailed {
            output.push_str(&self.format_header("Sections", 3));
            for (section, score) in &breakdown.sections {
                output.push_str(&format!("  {:<13} {:.1}\n", section.to_string(), score));
            }
        }

        output.push_str(&self.format_header(&format!("Keywords ({} searched)", keywords.len()), 3));
        for m in &breakdown.keywords.matches {
            output.push_str(&format!(
                "  {} {} ({}, weight {:.2})\n",
                self.colorize("✓", Color::Green),
                m.keyword,
                tier_label(m.tier),
                m.weight
            ));
        }
        for missing in &breakdown.keywords.missing {
            output.push_str(&format!("  {} {}\n", self.colorize("✗", Color::Red), missing));
        }
    }

    fn format_semantic(&self, output: &mut String, result: &AnalysisResult) {
        if result.is_degraded() {
            output.push_str(&format!(
                "{}\n",
                self.colorize("Embedding model unavailable: basic word-overlap scoring was used", Color::Yellow)
            ));
        }

        output.push_str(&self.format_header("Format Analysis", 2));
        output.push_str(&format!("Score: {:.0}/100\n", result.format_analysis.score));
        for issue in &result.format_analysis.issues {
            output.push_str(&format!("  ! {}\n", self.colorize(issue, Color::Yellow)));
        }
        if self.detailed {
            for suggestion in &result.format_analysis.suggestions {
                output.push_str(&format!("  - {}\n", suggestion));
            }
        }

        output.push_str(&self.format_header("Content Analysis", 2));
        output.push_str(&format!(
            "Matched job-description words: {}\n",
            result.content_analysis.keyword_match
        ));
        for suggestion in &result.content_analysis.suggestions {
            output.push_str(&format!("  - {}\n", suggestion));
        }
        if self.detailed && !result.content_analysis.missing_keywords.is_empty() {
            output.push_str(&format!(
                "Missing: {}\n",
                result.content_analysis.missing_keywords.join(", ")
            ));
        }

        if let Some(strengths) = &result.strengths {
            self.format_list(output, "✅ Strengths", strengths, Color::Green);
        }
        if let Some(weaknesses) = &result.weaknesses {
            self.format_list(output, "⚠ Weaknesses", weaknesses, Color::Red);
        }
        if let Some(improvements) = &result.improvements {
            self.format_list(output, "🎯 Improvements", improvements, Color::Cyan);
        }
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &ScoreReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("📊 ATS SCORE REPORT", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.processing_time_ms
        ));
        if let Some(model) = &report.metadata.model {
            output.push_str(&format!("Model: {}\n", model));
        }

        let score = report.ats_score();
        output.push_str(&format!(
            "\nATS Score: {:.2}/100 {}\n",
            score,
            self.format_score_badge(score)
        ));
        output.push_str(&format!("Verdict: {}\n", self.colorize(report.verdict(), Color::Cyan)));

        match &report.result {
            ReportKind::Heuristic { keywords, breakdown } => {
                self.format_heuristic(&mut output, keywords, breakdown)
            }
            ReportKind::Semantic(result) => self.format_semantic(&mut output, result),
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &ScoreReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn markdown_list(output: &mut String, title: &str, items: &[String]) {
        if items.is_empty() {
            return;
        }
        output.push_str(&format!("### {}\n\n", title));
        for item in items {
            output.push_str(&format!("- {}\n", item));
        }
        output.push('\n');
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &ScoreReport) -> Result<String> {
        let mut output = String::new();

        output.push_str("# ATS Score Report\n\n");

        if self.include_metadata {
            let resume_name = Path::new(&report.metadata.resume_file)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .ok_or_else(|| {
                    AtsScorerError::OutputFormatting(format!(
                        "resume path has no file name: {}",
                        report.metadata.resume_file
                    ))
                })?;

            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.processing_time_ms
            ));
            output.push_str(&format!("**Resume:** `{}`", resume_name));
            if let Some(job) = &report.metadata.job_file {
                output.push_str(&format!(" | **Job:** `{}`", job));
            }
            output.push_str("\n\n");
        }

        output.push_str(&format!("**ATS Score:** {:.2}/100\n\n", report.ats_score()));
        output.push_str(&format!("**Verdict:** {}\n\n", report.verdict()));

        match &report.result {
            ReportKind::Heuristic { breakdown, .. } => {
                output.push_str("## Score Breakdown\n\n");
                output.push_str("| Component | Score | Weight |\n");
                output.push_str("|-----------|-------|--------|\n");
                output.push_str(&format!("| Sections | {} | 25% |\n", percent(breakdown.section_score)));
                output.push_str(&format!("| Keywords | {} | 35% |\n", percent(breakdown.keyword_score)));
                output.push_str(&format!("| Formatting | {} | 20% |\n", percent(breakdown.format_score)));
                output.push_str(&format!("| Context | {} | 20% |\n\n", percent(breakdown.context_score)));

                output.push_str("## Keywords\n\n");
                output.push_str("| Keyword | Match | Weight |\n");
                output.push_str("|---------|-------|--------|\n");
                for m in &breakdown.keywords.matches {
                    output.push_str(&format!("| {} | {} | {:.2} |\n", m.keyword, tier_label(m.tier), m.weight));
                }
                for missing in &breakdown.keywords.missing {
                    output.push_str(&format!("| {} | missing | 0.00 |\n", missing));
                }
                output.push('\n');
            }
            ReportKind::Semantic(result) => {
                if result.is_degraded() {
                    output.push_str("> Embedding model unavailable: basic word-overlap scoring was used.\n\n");
                }

                output.push_str("## Format Analysis\n\n");
                output.push_str(&format!("**Score:** {:.0}/100\n\n", result.format_analysis.score));
                Self::markdown_list(&mut output, "Issues", &result.format_analysis.issues);
                Self::markdown_list(&mut output, "Suggestions", &result.format_analysis.suggestions);

                output.push_str("## Content Analysis\n\n");
                output.push_str(&format!(
                    "**Matched words:** {}\n\n",
                    result.content_analysis.keyword_match
                ));
                Self::markdown_list(&mut output, "Suggestions", &result.content_analysis.suggestions);

                if result.has_insights() {
                    output.push_str("## Insights\n\n");
                }
                Self::markdown_list(&mut output, "Strengths", result.strengths.as_deref().unwrap_or_default());
                Self::markdown_list(&mut output, "Weaknesses", result.weaknesses.as_deref().unwrap_or_default());
                Self::markdown_list(&mut output, "Improvements", result.improvements.as_deref().unwrap_or_default());
            }
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(true, false),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(&self, report: &ScoreReport, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

pub fn suggest_filename(format: OutputFormat, resume_name: &str) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    match format {
        OutputFormat::Console => format!("{}_ats.txt", base_name),
        OutputFormat::Json => format!("{}_ats.json", base_name),
        OutputFormat::Markdown => format!("{}_ats.md", base_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::report::ReportMetadata;
    use crate::processing::result::FormatAnalysis;

    fn semantic_report() -> ScoreReport {
        let result = AnalysisResult {
            ats_score: 72.5,
            format_analysis: FormatAnalysis::basic(),
            strengths: Some(vec!["Meets education requirements".to_string()]),
            weaknesses: Some(vec![]),
            improvements: Some(vec!["Add missing required skills: go".to_string()]),
            ..AnalysisResult::default()
        };
        ScoreReport::semantic(ReportMetadata::new("resumes/jane.txt", Some("job.txt".to_string())), result)
    }

    #[test]
    fn test_console_without_colors() {
        let output = ConsoleFormatter::new(false, true)
            .format_report(&semantic_report())
            .unwrap();
        assert!(output.contains("ATS Score: 72.50/100 [GOOD]"));
        assert!(output.contains("basic word-overlap scoring"));
        assert!(output.contains("  • Meets education requirements"));
        assert!(!output.contains("Weaknesses"));
    }

    #[test]
    fn test_json_round_trips_score() {
        let output = JsonFormatter::new(false).format_report(&semantic_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["result"]["details"]["ats_score"], 72.5);
    }

    #[test]
    fn test_markdown_sections() {
        let output = MarkdownFormatter::new(true).format_report(&semantic_report()).unwrap();
        assert!(output.contains("**Resume:** `jane.txt` | **Job:** `job.txt`"));
        assert!(output.contains("### Improvements\n\n- Add missing required skills: go"));
        assert!(output.contains("> Embedding model unavailable"));
    }

    #[test]
    fn test_heuristic_console_lists_missing_keywords() {
        let mut breakdown = HeuristicBreakdown::default();
        breakdown.ats_score = 35.0;
        breakdown.keywords.missing = vec!["graphql".to_string()];
        let report = ScoreReport::heuristic(
            ReportMetadata::new("resume.txt", None),
            vec!["graphql".to_string()],
            breakdown,
        );

        let output = ReportGenerator::with_options(false, false, true, false)
            .generate_report(&report, OutputFormat::Console)
            .unwrap();
        assert!(output.contains("✗ graphql"));
        assert!(output.contains("[WEAK]"));
    }

    #[test]
    fn test_suggest_filename() {
        assert_eq!(suggest_filename(OutputFormat::Json, "docs/jane_resume.txt"), "jane_resume_ats.json");
        assert_eq!(suggest_filename(OutputFormat::Markdown, "cv.md"), "cv_ats.md");
    }

    #[test]
    fn test_save_report_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("out.md");
        save_report_to_file("# ATS Score Report\n", &path).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "# ATS Score Report\n");
    }
}
