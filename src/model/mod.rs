//! Document model types.
//!
//! This module defines the materialized view of a document that the
//! extraction collaborators hand to the engine: pages with positioned text
//! fragments, candidate table grids, ruling segments and form fields.

mod document;
mod field;
pub mod geometry;
mod page;
mod table;

pub use document::{Document, Metadata};
pub use field::{ChoiceOption, FieldKind, FieldSpec, FormField, Widget};
pub use geometry::{Point, Rect};
pub use page::{Page, Ruling, TextFragment};
pub use table::{Cell, NormalizedTable, RawTable, TableKind};
