pub mod spreadsheet;
pub mod text;

pub use spreadsheet::{parse_repeat, SpreadsheetExtractor};
pub use text::TextDocumentExtractor;

use crate::error::{OdfTextError, Result};
use roxmltree::Node;
use serde::Serialize;
use std::path::Path;

pub const OFFICE_NS: &str = "urn:oasis:names:tc:opendocument:xmlns:office:1.0";
pub const TEXT_NS: &str = "urn:oasis:names:tc:opendocument:xmlns:text:1.0";
pub const TABLE_NS: &str = "urn:oasis:names:tc:opendocument:xmlns:table:1.0";

/// Turns content markup into a plain-text rendering.
pub trait ContentExtractor {
    fn extract(&self, markup: &str) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Text,
    Spreadsheet,
}

impl DocumentKind {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "odt" => Some(DocumentKind::Text),
            "ods" => Some(DocumentKind::Spreadsheet),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| OdfTextError::UnsupportedType {
                name: path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string()),
            })
    }

    pub fn extractor(&self) -> &'static dyn ContentExtractor {
        match self {
            DocumentKind::Text => &TextDocumentExtractor,
            DocumentKind::Spreadsheet => &SpreadsheetExtractor,
        }
    }

    pub fn extract(&self, markup: &str) -> Result<String> {
        self.extractor().extract(markup)
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Text => write!(f, "text document"),
            DocumentKind::Spreadsheet => write!(f, "spreadsheet"),
        }
    }
}

/// Find the `office:body/office:<section>` element under the document root.
pub(crate) fn find_body_section<'a, 'input>(
    doc: &'a roxmltree::Document<'input>,
    section: &str,
) -> Option<Node<'a, 'input>> {
    let body = child_element(doc.root_element(), OFFICE_NS, "body")?;
    child_element(body, OFFICE_NS, section)
}

pub(crate) fn child_element<'a, 'input>(
    parent: Node<'a, 'input>,
    namespace: &str,
    name: &str,
) -> Option<Node<'a, 'input>> {
    parent
        .children()
        .find(|n| n.is_element() && n.has_tag_name((namespace, name)))
}

/// Concatenate every text fragment below `node`, ignoring the markup between them.
pub(crate) fn inner_text(node: Node) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}
