//! Document variant detection.
//!
//! Questionnaire-style documents carry a fixed heading on their first page
//! and a label table on the second. For those, single-cell numbered tables
//! are emitted as question markers so the output can later be split into
//! one chunk per question.

use crate::error::Result;
use crate::model::{Page, RawTable};
use crate::table::{collapse_newlines, is_valid_table, QuestionRule, DEFAULT_QUESTION_PATTERN};
use serde::{Deserialize, Serialize};

/// Default marker emitted before each question heading.
pub const DEFAULT_QUESTION_MARKER: &str = "§§QUESTION§§";

/// How the document variant is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantMode {
    /// Always treat the document as a standard document
    #[default]
    Standard,
    /// Always treat the document as a structured questionnaire
    StructuredQuestion,
    /// Detect the variant from the document's contents
    Auto,
}

/// Variant a document was processed as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Plain document
    #[default]
    Standard,
    /// Questionnaire with numbered question tables
    StructuredQuestion,
}

impl Variant {
    /// Whether question tables are recognized.
    pub fn is_structured(self) -> bool {
        self == Variant::StructuredQuestion
    }
}

/// What a structured questionnaire looks like.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestionProfile {
    /// Page (1-based) whose text starts with the heading
    pub heading_page: u32,
    /// Heading text
    pub heading: String,
    /// Page (1-based) holding the label table
    pub label_page: u32,
    /// Expected first-column labels, in order
    pub labels: Vec<String>,
    /// Marker emitted before each question
    pub marker: String,
    /// Pattern recognizing numbered question headings
    pub heading_pattern: String,
}

impl Default for QuestionProfile {
    fn default() -> Self {
        Self {
            heading_page: 1,
            heading: "Due Diligence Questionnaire".to_string(),
            label_page: 2,
            labels: ["Institution Name", "Registered Address", "Completed By", "Date"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            marker: DEFAULT_QUESTION_MARKER.to_string(),
            heading_pattern: DEFAULT_QUESTION_PATTERN.to_string(),
        }
    }
}

impl QuestionProfile {
    /// Compile the question rule for the table normalizer.
    pub fn rule(&self) -> Result<QuestionRule> {
        QuestionRule::new(&self.heading_pattern, self.marker.clone())
    }
}

/// Decides whether a document is a structured questionnaire.
#[derive(Debug, Clone, Default)]
pub struct VariantDetector {
    profile: QuestionProfile,
}

impl VariantDetector {
    /// Create a detector for a profile.
    pub fn new(profile: QuestionProfile) -> Self {
        Self { profile }
    }

    /// Apply the configured mode, detecting only in [`VariantMode::Auto`].
    ///
    /// `tables` holds the candidate tables of each page, parallel to `pages`.
    pub fn resolve(&self, mode: VariantMode, pages: &[Page], tables: &[Vec<RawTable>]) -> Variant {
        match mode {
            VariantMode::Standard => Variant::Standard,
            VariantMode::StructuredQuestion => Variant::StructuredQuestion,
            VariantMode::Auto => self.detect(pages, tables),
        }
    }

    /// Detect the variant from the heading page text and the label table.
    pub fn detect(&self, pages: &[Page], tables: &[Vec<RawTable>]) -> Variant {
        let variant = if self.has_heading(pages) && self.has_label_table(tables) {
            Variant::StructuredQuestion
        } else {
            Variant::Standard
        };
        log::debug!("Detected document variant: {:?}", variant);
        variant
    }

    fn has_heading(&self, pages: &[Page]) -> bool {
        let Some(page) = page_at(pages, self.profile.heading_page) else {
            return false;
        };
        page.plain_text().trim_start().starts_with(&self.profile.heading)
    }

    fn has_label_table(&self, tables: &[Vec<RawTable>]) -> bool {
        let Some(candidates) = page_at(tables, self.profile.label_page) else {
            return false;
        };
        let valid: Vec<&RawTable> = candidates.iter().filter(|t| is_valid_table(t)).collect();
        let [table] = valid.as_slice() else {
            return false;
        };

        let first_column: Vec<String> = table
            .rows
            .iter()
            .filter_map(|row| row.first())
            .map(|cell| collapse_newlines(&cell.text))
            .filter(|text| !text.is_empty())
            .collect();
        first_column == self.profile.labels
    }
}

fn page_at<T>(items: &[T], number: u32) -> Option<&T> {
    (number as usize).checked_sub(1).and_then(|idx| items.get(idx))
}
