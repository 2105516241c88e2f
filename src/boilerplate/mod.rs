//! Cross-page boilerplate detection.
//!
//! The analyzer collects every header and footer line of the document (plus
//! body lines that look like known upload placeholders), counts how often
//! each one recurs and clusters near-duplicates by edit similarity. Lines
//! that recur on enough pages end up in a [`RemovalSet`] keyed by text and
//! scoped to the regions they were seen in.

mod analyzer;
mod removal;
mod similarity;
mod stats;

pub use analyzer::{
    BoilerplateOptions, LineFrequencyAnalyzer, DEFAULT_FREQUENCY_THRESHOLD, DEFAULT_PAGE_NUMBER_PATTERN,
};
pub use removal::RemovalSet;
pub use similarity::{similarity, DEFAULT_SIMILARITY_THRESHOLD};
pub use stats::{LineStat, LineStats};

pub(crate) use stats::{clean_line, region_lines, RegionLine};
