//! Per-line occurrence statistics.

use crate::layout::{RegionLayout, RegionName};
use crate::model::TextFragment;
use std::collections::{BTreeSet, HashMap};
use unicode_normalization::UnicodeNormalization;

/// Trim a line and optionally bring it to Unicode NFC form.
pub(crate) fn clean_line(text: &str, normalize_unicode: bool) -> String {
    let trimmed = text.trim();
    if normalize_unicode {
        trimmed.nfc().collect()
    } else {
        trimmed.to_string()
    }
}

/// Fragments of one extractor line that fall in the same region.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RegionLine {
    pub region: RegionName,
    /// Positions of the member fragments in the page's stream
    pub members: Vec<usize>,
    /// Member texts joined by a single space, uncleaned
    pub text: String,
}

/// Group a fragment stream into region lines, in reading order.
///
/// Consecutive fragments sharing a line id and a region form one line.
/// Fragments outside the page are skipped.
pub(crate) fn region_lines(fragments: &[TextFragment], layout: &RegionLayout) -> Vec<RegionLine> {
    let mut lines: Vec<(u32, RegionLine)> = Vec::new();
    for (idx, fragment) in fragments.iter().enumerate() {
        let Some(region) = layout.locate(fragment.anchor()) else {
            continue;
        };
        match lines.last_mut() {
            Some((line, last)) if *line == fragment.line && last.region == region => {
                last.text.push(' ');
                last.text.push_str(&fragment.text);
                last.members.push(idx);
            }
            _ => lines.push((
                fragment.line,
                RegionLine {
                    region,
                    members: vec![idx],
                    text: fragment.text.clone(),
                },
            )),
        }
    }
    lines.into_iter().map(|(_, line)| line).collect()
}

/// Occurrences of one distinct line across the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineStat {
    /// Number of occurrences
    pub count: usize,
    /// Regions the line was seen in
    pub regions: BTreeSet<RegionName>,
}

impl LineStat {
    /// Whether the line was only ever seen in the body.
    pub fn is_body_only(&self) -> bool {
        self.regions.iter().all(|r| *r == RegionName::Body)
    }
}

/// Line statistics in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct LineStats {
    entries: Vec<(String, LineStat)>,
    index: HashMap<String, usize>,
}

impl LineStats {
    /// Create empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `line` in `region`. Empty lines are ignored.
    pub fn record(&mut self, line: &str, region: RegionName) {
        if line.is_empty() {
            return;
        }
        let idx = match self.index.get(line) {
            Some(&idx) => idx,
            None => {
                self.entries.push((line.to_string(), LineStat::default()));
                self.index.insert(line.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        let stat = &mut self.entries[idx].1;
        stat.count += 1;
        stat.regions.insert(region);
    }

    /// Get the statistics of one line.
    pub fn get(&self, line: &str) -> Option<&LineStat> {
        self.index.get(line).map(|&idx| &self.entries[idx].1)
    }

    /// Iterate over lines in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LineStat)> {
        self.entries.iter().map(|(line, stat)| (line.as_str(), stat))
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no line was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
