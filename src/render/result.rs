//! Reconstruction statistics.

use serde::{Deserialize, Serialize};

/// Counters collected while reconstructing pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconstructionStats {
    /// Total number of pages processed
    pub page_count: u32,

    /// Number of fragments visited
    pub fragment_count: u32,

    /// Fragments dropped as boilerplate
    pub suppressed_count: u32,

    /// Fragments swallowed by a table block
    pub table_fragment_count: u32,

    /// Table blocks emitted
    pub table_count: u32,

    /// Placeholder tokens replaced by field values
    pub field_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl ReconstructionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ReconstructionStats) {
        self.page_count += other.page_count;
        self.fragment_count += other.fragment_count;
        self.suppressed_count += other.suppressed_count;
        self.table_fragment_count += other.table_fragment_count;
        self.table_count += other.table_count;
        self.field_count += other.field_count;
        self.word_count += other.word_count;
        self.char_count += other.char_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_text() {
        let mut stats = ReconstructionStats::new();
        stats.count_text("| Name | Role |\nAnn CEO");

        assert_eq!(stats.word_count, 7);
        assert_eq!(stats.char_count, 17);
    }

    #[test]
    fn test_merge() {
        let mut total = ReconstructionStats {
            page_count: 1,
            suppressed_count: 2,
            ..Default::default()
        };
        let other = ReconstructionStats {
            page_count: 1,
            table_count: 3,
            field_count: 1,
            ..Default::default()
        };
        total.merge(&other);

        assert_eq!(total.page_count, 2);
        assert_eq!(total.suppressed_count, 2);
        assert_eq!(total.table_count, 3);
        assert_eq!(total.field_count, 1);
    }
}
