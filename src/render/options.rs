//! Output options.

use super::JsonFormat;
use crate::error::{Error, Result};
use std::ops::RangeInclusive;

/// Options for whole-document output.
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    /// Include YAML frontmatter with metadata (Markdown only)
    pub include_frontmatter: bool,

    /// Pages to include in the output
    pub pages: PageSelection,

    /// JSON layout
    pub json_format: JsonFormat,
}

impl OutputOptions {
    /// Create output options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable frontmatter.
    pub fn with_frontmatter(mut self, include: bool) -> Self {
        self.include_frontmatter = include;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Set the JSON layout.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }
}

/// Which pages end up in the output.
///
/// Boilerplate statistics always cover the whole document; the selection
/// only filters what is written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// Every page
    #[default]
    All,
    /// An inclusive range of page numbers (1-based)
    Range(RangeInclusive<u32>),
    /// Specific page numbers (1-based), sorted
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number is selected.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.binary_search(&page).is_ok(),
        }
    }

    /// Parse "all", "3-7" or "1,3,5-7".
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(PageSelection::All);
        }

        if !s.contains(',') {
            if let Some((start, end)) = s.split_once('-') {
                return Ok(PageSelection::Range(page_number(start)?..=page_number(end)?));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.split_once('-') {
                Some((start, end)) => pages.extend(page_number(start)?..=page_number(end)?),
                None => pages.push(page_number(part)?),
            }
        }
        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}

fn page_number(s: &str) -> Result<u32> {
    s.trim()
        .parse()
        .map_err(|_| Error::InvalidConfig(format!("invalid page number '{}'", s.trim())))
}
