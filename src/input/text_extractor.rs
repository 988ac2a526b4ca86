//! Plain-text extraction from supported input files

use crate::error::Result;
use pulldown_cmark::{Event, Parser, Tag};
use std::path::Path;
use tokio::fs;

pub trait TextExtractor {
    fn extract(&self, path: &Path) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let content = fs::read_to_string(path).await?;
        Ok(content)
    }
}

pub struct MarkdownExtractor;

impl TextExtractor for MarkdownExtractor {
    async fn extract(&self, path: &Path) -> Result<String> {
        let markdown_content = fs::read_to_string(path).await?;
        Ok(markdown_to_text(&markdown_content))
    }
}

/// Strip markdown markup while keeping the line layout the analyzers look at:
/// headings on their own line, list items as "- " bullets.
pub fn markdown_to_text(markdown: &str) -> String {
    let mut output = String::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Item) => output.push_str("- "),
            Event::End(Tag::Heading(..)) | Event::End(Tag::Paragraph) | Event::End(Tag::Item) => {
                output.push('\n')
            }
            Event::Text(text) | Event::Code(text) => output.push_str(&text),
            Event::SoftBreak | Event::HardBreak => output.push('\n'),
            _ => {}
        }
    }

    let lines: Vec<&str> = output
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect();

    lines.join("\n")
}
