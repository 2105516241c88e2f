//! Line Frequency Analyzer.

use super::similarity::{matches_any, similarity, DEFAULT_SIMILARITY_THRESHOLD};
use super::{clean_line, region_lines, LineStats, RemovalSet};
use crate::error::{Error, Result};
use crate::layout::{RegionLayout, RegionName, DEFAULT_BAND_HEIGHT};
use crate::model::Page;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Default fraction of pages a line must recur on to be boilerplate.
pub const DEFAULT_FREQUENCY_THRESHOLD: f32 = 0.7;

/// Default pattern for standalone page numbers ("7", "- 7 -", "– 12 –").
pub const DEFAULT_PAGE_NUMBER_PATTERN: &str = r"^[-–—]?\s*\d+\s*[-–—]?$";

/// Options for boilerplate detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoilerplateOptions {
    /// Height of the header and footer bands
    pub band_height: f32,

    /// Minimum occurrence fraction (count / pages) for removal
    pub frequency_threshold: f32,

    /// Minimum normalized similarity for two lines to cluster
    pub similarity_threshold: f32,

    /// Body phrases worth tracking (upload placeholders and the like)
    pub known_phrases: Vec<String>,

    /// Pattern recognizing page numbers
    pub page_number_pattern: String,

    /// Remove body-only known phrases regardless of frequency
    pub always_remove_known_phrases: bool,

    /// Apply Unicode NFC to lines before counting
    pub normalize_unicode: bool,
}

impl Default for BoilerplateOptions {
    fn default() -> Self {
        Self {
            band_height: DEFAULT_BAND_HEIGHT,
            frequency_threshold: DEFAULT_FREQUENCY_THRESHOLD,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            known_phrases: vec![
                "(No file attached)".to_string(),
                "Please upload supporting document".to_string(),
            ],
            page_number_pattern: DEFAULT_PAGE_NUMBER_PATTERN.to_string(),
            always_remove_known_phrases: false,
            normalize_unicode: true,
        }
    }
}

impl BoilerplateOptions {
    /// Set the band height.
    pub fn with_band_height(mut self, height: f32) -> Self {
        self.band_height = height;
        self
    }

    /// Set the frequency threshold.
    pub fn with_frequency_threshold(mut self, threshold: f32) -> Self {
        self.frequency_threshold = threshold;
        self
    }

    /// Set the similarity threshold.
    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Replace the known body phrases.
    pub fn with_known_phrases<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_phrases = phrases.into_iter().map(Into::into).collect();
        self
    }

    /// Remove body-only known phrases even when they are rare.
    pub fn with_always_remove_known_phrases(mut self, enabled: bool) -> Self {
        self.always_remove_known_phrases = enabled;
        self
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if !self.band_height.is_finite() || self.band_height < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "band height must be a non-negative number, got {}",
                self.band_height
            )));
        }
        check_fraction("frequency threshold", self.frequency_threshold)?;
        check_fraction("similarity threshold", self.similarity_threshold)?;
        Ok(())
    }
}

fn check_fraction(name: &str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!(
            "{} must be within [0, 1], got {}",
            name, value
        )))
    }
}

/// Finds lines that repeat across pages.
#[derive(Debug, Clone)]
pub struct LineFrequencyAnalyzer {
    options: BoilerplateOptions,
    page_number: Regex,
}

impl LineFrequencyAnalyzer {
    /// Create an analyzer, validating the options.
    pub fn new(options: BoilerplateOptions) -> Result<Self> {
        options.validate()?;
        let page_number = Regex::new(&options.page_number_pattern)?;
        Ok(Self {
            options,
            page_number,
        })
    }

    /// Options in use.
    pub fn options(&self) -> &BoilerplateOptions {
        &self.options
    }

    /// Build line statistics and decide which lines to remove.
    pub fn analyze(&self, pages: &[Page]) -> RemovalSet {
        let stats = self.collect(pages);
        self.decide(&stats, pages.len())
    }

    /// Accumulate header, footer and tracked body lines over all pages.
    pub fn collect(&self, pages: &[Page]) -> LineStats {
        let mut stats = LineStats::new();
        for page in pages {
            let layout = RegionLayout::new(page.media_box, self.options.band_height);
            for (region, line) in self.region_lines(page, &layout) {
                if region == RegionName::Body && !self.is_known_phrase(&line) {
                    continue;
                }
                stats.record(&line, region);
            }
        }
        log::debug!(
            "Collected {} distinct lines from {} pages",
            stats.len(),
            pages.len()
        );
        stats
    }

    /// Turn statistics into a removal set for a document of `total_pages`.
    pub fn decide(&self, stats: &LineStats, total_pages: usize) -> RemovalSet {
        let mut removal = RemovalSet::new(self.options.normalize_unicode);
        if total_pages == 0 {
            return removal;
        }
        let pages = total_pages as f32;
        let threshold = self.options.frequency_threshold;
        let entries: Vec<_> = stats.iter().collect();

        for (idx, (line, stat)) in entries.iter().enumerate() {
            if removal.contains(line) {
                continue;
            }

            let frequent = stat.count as f32 / pages >= threshold;
            let page_number = self.is_page_number(line) && !stat.is_body_only();
            let known = self.options.always_remove_known_phrases
                && stat.is_body_only()
                && self.is_known_phrase(line);
            if frequent || page_number || known {
                log::debug!(
                    "Removing {:?} ({} occurrences, {:?})",
                    line,
                    stat.count,
                    stat.regions
                );
                removal.insert(line, stat.regions.iter().copied());
                continue;
            }

            let mut cluster = vec![idx];
            let mut count = stat.count;
            for (other_idx, (other, other_stat)) in entries.iter().enumerate().skip(idx + 1) {
                if removal.contains(other) {
                    continue;
                }
                if similarity(line, other) >= self.options.similarity_threshold {
                    cluster.push(other_idx);
                    count += other_stat.count;
                }
            }

            if count as f32 / pages > threshold {
                log::debug!(
                    "Removing cluster of {} lines around {:?} ({} occurrences)",
                    cluster.len(),
                    line,
                    count
                );
                for member in cluster {
                    let (text, member_stat) = entries[member];
                    removal.insert(text, member_stat.regions.iter().copied());
                }
            }
        }

        removal
    }

    /// Lines of one page split by region, in reading order.
    ///
    /// Fragments that share an extractor line id and fall in the same region
    /// are joined with a single space.
    pub fn region_lines(&self, page: &Page, layout: &RegionLayout) -> Vec<(RegionName, String)> {
        region_lines(&page.fragments, layout)
            .into_iter()
            .map(|line| (line.region, clean_line(&line.text, self.options.normalize_unicode)))
            .filter(|(_, text)| !text.is_empty())
            .collect()
    }

    /// Check if a line is a standalone page number.
    pub fn is_page_number(&self, line: &str) -> bool {
        self.page_number.is_match(line.trim())
    }

    /// Check if a line fuzzily matches one of the known body phrases.
    pub fn is_known_phrase(&self, line: &str) -> bool {
        matches_any(
            line,
            &self.options.known_phrases,
            self.options.similarity_threshold,
        )
    }
}
