//! Table detection and normalization.

mod lattice;
mod normalize;

pub use lattice::LatticeDetector;
pub use normalize::{
    collapse_newlines, is_valid_table, QuestionRule, TableNormalizer, TableOptions, DEFAULT_QUESTION_PATTERN,
};
