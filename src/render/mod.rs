//! Page reconstruction and output rendering.

mod chunk;
mod cleanup;
mod json;
mod options;
mod output;
mod reconstruct;
mod result;
mod sink;

pub use chunk::{split_chunks, Chunk};
pub use cleanup::{collapse_blank_lines, finish_page};
pub use json::{to_json, JsonFormat};
pub use options::{OutputOptions, PageSelection};
pub use output::{to_markdown, to_text, PageText};
pub use reconstruct::{splice_tokens, PageReconstructor, SPLICE_LINE_TOLERANCE};
pub use result::ReconstructionStats;
pub use sink::{EmitSink, Recorder};
