//! Whole-document output.

use super::OutputOptions;
use crate::model::Metadata;
use serde::{Deserialize, Serialize};

/// Reconstructed text of one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    /// Page number (1-based)
    pub number: u32,
    /// Final page text, empty or ending in one newline
    pub text: String,
}

impl PageText {
    /// Create a page text.
    pub fn new(number: u32, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }
}

/// Concatenate the selected pages.
pub fn to_text(pages: &[PageText], options: &OutputOptions) -> String {
    pages
        .iter()
        .filter(|page| options.pages.includes(page.number))
        .map(|page| page.text.as_str())
        .collect()
}

/// Markdown output: optional frontmatter, then the selected non-empty pages
/// separated by a blank line. Tables are already `|` rows.
pub fn to_markdown(metadata: &Metadata, pages: &[PageText], options: &OutputOptions) -> String {
    let mut output = String::new();

    if options.include_frontmatter {
        output.push_str(&metadata.to_yaml_frontmatter(pages.len() as u32));
        output.push('\n');
    }

    let body: Vec<&str> = pages
        .iter()
        .filter(|page| options.pages.includes(page.number))
        .map(|page| page.text.trim_end())
        .filter(|text| !text.is_empty())
        .collect();

    output.push_str(&body.join("\n\n"));
    if !body.is_empty() {
        output.push('\n');
    }
    output
}
