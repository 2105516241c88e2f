//! Lines marked for suppression.

use super::clean_line;
use crate::layout::{RegionLayout, RegionName};
use crate::model::Point;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Line text mapped to the regions where its occurrences are suppressed.
///
/// Lookups trim the fragment text and apply the same Unicode normalization
/// the analyzer used when the set was built.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RemovalSet {
    lines: BTreeMap<String, BTreeSet<RegionName>>,
    #[serde(skip)]
    normalize_unicode: bool,
}

impl RemovalSet {
    /// Create an empty set.
    pub fn new(normalize_unicode: bool) -> Self {
        Self {
            lines: BTreeMap::new(),
            normalize_unicode,
        }
    }

    /// Mark `line` for removal in `regions`, merging with earlier marks.
    pub fn insert<I>(&mut self, line: &str, regions: I)
    where
        I: IntoIterator<Item = RegionName>,
    {
        let key = clean_line(line, self.normalize_unicode);
        if key.is_empty() {
            return;
        }
        self.lines.entry(key).or_default().extend(regions);
    }

    /// Regions in which `text` is suppressed.
    pub fn regions(&self, text: &str) -> Option<&BTreeSet<RegionName>> {
        self.lines.get(&clean_line(text, self.normalize_unicode))
    }

    /// Check whether `text` is marked at all.
    pub fn contains(&self, text: &str) -> bool {
        self.regions(text).is_some()
    }

    /// Positional check: `text` is marked and `anchor` lies inside one of
    /// its regions on the page described by `layout`.
    pub fn suppresses(&self, text: &str, anchor: Point, layout: &RegionLayout) -> bool {
        layout
            .locate(anchor)
            .is_some_and(|region| self.suppresses_in(text, region))
    }

    /// Check whether `text` is marked in `region`.
    pub fn suppresses_in(&self, text: &str, region: RegionName) -> bool {
        self.regions(text)
            .is_some_and(|regions| regions.contains(&region))
    }

    /// Iterate over marked lines in lexical order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<RegionName>)> {
        self.lines.iter().map(|(line, regions)| (line.as_str(), regions))
    }

    /// Number of marked lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if nothing is marked.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rect;

    #[test]
    fn test_insert_merges_regions() {
        let mut set = RemovalSet::new(true);
        set.insert(" ACME Corp ", [RegionName::Header]);
        set.insert("ACME Corp", [RegionName::Footer]);

        assert_eq!(set.len(), 1);
        let regions = set.regions("ACME Corp").unwrap();
        assert!(regions.contains(&RegionName::Header));
        assert!(regions.contains(&RegionName::Footer));
    }

    #[test]
    fn test_suppresses_is_positional() {
        let layout = RegionLayout::new(Rect::letter(), 75.0);
        let mut set = RemovalSet::new(true);
        set.insert("7", [RegionName::Header]);

        assert!(set.suppresses("7", Point::new(300.0, 30.0), &layout));
        assert!(set.suppresses(" 7 ", Point::new(300.0, 30.0), &layout));
        // same text in the body is kept
        assert!(!set.suppresses("7", Point::new(300.0, 400.0), &layout));
        assert!(!set.suppresses("8", Point::new(300.0, 30.0), &layout));
    }

    #[test]
    fn test_suppression_follows_region_partition() {
        let layout = RegionLayout::new(Rect::letter(), 75.0);
        let mut set = RemovalSet::new(true);
        set.insert("X", [RegionName::Header]);

        assert!(set.suppresses("X", Point::new(100.0, 74.9), &layout));
        // just below the header band belongs to the body only
        assert_eq!(layout.locate(Point::new(100.0, 75.3)), Some(RegionName::Body));
        assert!(!set.suppresses("X", Point::new(100.0, 75.3), &layout));
        assert!(!set.suppresses("X", Point::new(100.0, 75.0), &layout));
        assert!(set.suppresses_in("X", RegionName::Header));
        assert!(!set.suppresses_in("X", RegionName::Footer));
    }

    #[test]
    fn test_empty_line_is_ignored() {
        let mut set = RemovalSet::new(false);
        set.insert("   ", [RegionName::Header]);
        assert!(set.is_empty());
    }

    #[test]
    fn test_serialize_is_sorted() {
        let mut set = RemovalSet::new(false);
        set.insert("b", [RegionName::Footer]);
        set.insert("a", [RegionName::Header, RegionName::Footer]);

        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"{"lines":{"a":["header","footer"],"b":["footer"]}}"#);
    }
}
