//! Form field resolution.
//!
//! Every widget of every field becomes one [`FormField`](crate::model::FormField)
//! entry: a display string, the page it sits on and a unique placeholder
//! token the reconstructor swaps back for the display string.

mod overflow;
mod resolver;

pub use overflow::{estimate_lines, font_size, text_overflows, DEFAULT_FONT_SIZE};
pub use resolver::{FieldMap, FieldOptions, FieldResolver, FieldScope, TokenSequence};
