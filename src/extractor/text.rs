use super::{find_body_section, inner_text, ContentExtractor, TEXT_NS};
use crate::error::Result;

/// Renders the paragraphs and headings of an `office:text` body.
///
/// Lines are separated by a blank line. Runs of identical adjacent lines,
/// usually repeated header or footer artifacts, collapse to a single line.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextDocumentExtractor;

impl ContentExtractor for TextDocumentExtractor {
    fn extract(&self, markup: &str) -> Result<String> {
        let doc = roxmltree::Document::parse(markup)?;

        let Some(text_body) = find_body_section(&doc, "text") else {
            log::debug!("no office:text section, nothing to extract");
            return Ok(String::new());
        };

        let lines = text_body
            .descendants()
            .filter(|n| n.is_element())
            .filter(|n| n.has_tag_name((TEXT_NS, "p")) || n.has_tag_name((TEXT_NS, "h")))
            .map(|n| inner_text(n).trim().to_string())
            .filter(|line| !line.is_empty())
            .collect();

        let lines = collapse_adjacent_duplicates(lines);
        log::debug!("extracted {} text lines", lines.len());

        let mut rendered = lines.join("\n\n").trim().to_string();
        rendered.push('\n');
        Ok(rendered)
    }
}

fn collapse_adjacent_duplicates(mut lines: Vec<String>) -> Vec<String> {
    lines.dedup();
    lines
}
