//! # unplate
//!
//! Boilerplate removal and table-aware text reconstruction for paginated
//! documents.
//!
//! The input is the materialized output of a page extractor: positioned
//! text fragments, candidate table grids (or ruling segments), and form
//! fields. The output is one clean text per page, with recurring headers,
//! footers and page numbers removed, tables rewritten as `|` rows and form
//! placeholders replaced by their values.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unplate::{Document, Engine, EngineOptions};
//!
//! fn main() -> unplate::Result<()> {
//!     let doc = Document::from_json_file("document.json")?;
//!
//!     let engine = Engine::new(EngineOptions::default())?;
//!     let result = engine.process(&doc);
//!     println!("{}", result.text());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Boilerplate detection**: cross-page line statistics with fuzzy
//!   clustering of near-duplicate stamps, suppressed by position
//! - **Tables**: supplied grids or grids built from rulings, emitted once
//!   as delimited rows
//! - **Form fields**: checkbox, radio, combo and text values substituted
//!   for placeholder tokens, including inside table cells
//! - **Questionnaires**: numbered question tables turned into markers and
//!   split into per-question chunks
//! - **Parallel processing**: uses Rayon for multi-page documents

pub mod boilerplate;
pub mod engine;
pub mod error;
pub mod form;
pub mod layout;
pub mod model;
pub mod render;
pub mod source;
pub mod table;
pub mod variant;

// Re-export commonly used types
pub use boilerplate::{BoilerplateOptions, LineFrequencyAnalyzer, RemovalSet};
pub use engine::{Engine, EngineOptions, ProcessedDocument};
pub use error::{Error, Result};
pub use form::{FieldMap, FieldOptions, FieldScope, TokenSequence};
pub use layout::{RegionLayout, RegionName};
pub use model::{
    Cell, Document, FieldKind, FieldSpec, FormField, Metadata, Page, RawTable, Rect, Ruling,
    TextFragment,
};
pub use render::{Chunk, EmitSink, JsonFormat, OutputOptions, PageSelection, ReconstructionStats};
pub use source::{FieldSource, FragmentSource, TableSource};
pub use table::{LatticeDetector, TableOptions};
pub use variant::{QuestionProfile, Variant, VariantMode};

use std::path::Path;

/// Process a document dump with default options.
///
/// # Example
///
/// ```no_run
/// use unplate::process_file;
///
/// let result = process_file("document.json").unwrap();
/// println!("Pages: {}", result.pages.len());
/// ```
pub fn process_file<P: AsRef<Path>>(path: P) -> Result<ProcessedDocument> {
    Ok(Unplate::new().process_file(path)?.processed)
}

/// Clean a document dump and return its text.
///
/// # Example
///
/// ```no_run
/// use unplate::extract_text;
///
/// let text = extract_text("document.json").unwrap();
/// println!("{}", text);
/// ```
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    Ok(process_file(path)?.text())
}

/// Clean a document dump and return Markdown.
///
/// # Example
///
/// ```no_run
/// use unplate::to_markdown;
///
/// let markdown = to_markdown("document.json").unwrap();
/// std::fs::write("output.md", markdown).unwrap();
/// ```
pub fn to_markdown<P: AsRef<Path>>(path: P) -> Result<String> {
    Unplate::new().process_file(path)?.to_markdown()
}

/// Builder for cleaning documents.
///
/// # Example
///
/// ```no_run
/// use unplate::{Unplate, VariantMode};
///
/// let markdown = Unplate::new()
///     .with_band_height(60.0)
///     .with_variant_mode(VariantMode::Auto)
///     .with_frontmatter()
///     .sequential()
///     .process_file("document.json")?
///     .to_markdown()?;
/// # Ok::<(), unplate::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Unplate {
    engine_options: EngineOptions,
    output_options: OutputOptions,
}

impl Unplate {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing engine options.
    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.engine_options = options;
        self
    }

    /// Set the header/footer band height.
    pub fn with_band_height(mut self, height: f32) -> Self {
        self.engine_options = self.engine_options.with_band_height(height);
        self
    }

    /// Set the frequency threshold.
    pub fn with_frequency_threshold(mut self, threshold: f32) -> Self {
        self.engine_options = self.engine_options.with_frequency_threshold(threshold);
        self
    }

    /// Set the similarity threshold.
    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.engine_options = self.engine_options.with_similarity_threshold(threshold);
        self
    }

    /// Drop the `|---|` line after the first table row.
    pub fn without_header_separator(mut self) -> Self {
        self.engine_options = self.engine_options.with_header_separator(false);
        self
    }

    /// Leave form placeholders untouched.
    pub fn without_form_fields(mut self) -> Self {
        self.engine_options = self.engine_options.with_form_fields(false);
        self
    }

    /// Set the variant mode.
    pub fn with_variant_mode(mut self, mode: VariantMode) -> Self {
        self.engine_options = self.engine_options.with_variant_mode(mode);
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.engine_options = self.engine_options.sequential();
        self
    }

    /// Enable frontmatter in Markdown output.
    pub fn with_frontmatter(mut self) -> Self {
        self.output_options = self.output_options.with_frontmatter(true);
        self
    }

    /// Set page selection for output.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.output_options = self.output_options.with_pages(pages);
        self
    }

    /// Set the JSON layout.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.output_options = self.output_options.with_json_format(format);
        self
    }

    /// Process a document.
    pub fn process(self, document: &Document) -> Result<UnplateResult> {
        let engine = Engine::new(self.engine_options)?;
        Ok(UnplateResult {
            processed: engine.process(document),
            output_options: self.output_options,
        })
    }

    /// Load a document dump from a JSON file and process it.
    pub fn process_file<P: AsRef<Path>>(self, path: P) -> Result<UnplateResult> {
        let document = Document::from_json_file(path)?;
        self.process(&document)
    }
}

/// Result of processing a document through [`Unplate`].
#[derive(Debug, Clone)]
pub struct UnplateResult {
    /// The processed document
    pub processed: ProcessedDocument,
    /// Output options to use
    output_options: OutputOptions,
}

impl UnplateResult {
    /// Text of the selected pages.
    pub fn text(&self) -> String {
        self.processed.to_text(&self.output_options)
    }

    /// Convert to Markdown.
    pub fn to_markdown(&self) -> Result<String> {
        Ok(self.processed.to_markdown(&self.output_options))
    }

    /// Convert to JSON.
    pub fn to_json(&self) -> Result<String> {
        self.processed.to_json(&self.output_options)
    }

    /// Per-question chunks.
    pub fn chunks(&self) -> Vec<Chunk> {
        self.processed.chunks()
    }

    /// Get the processed document.
    pub fn processed(&self) -> &ProcessedDocument {
        &self.processed
    }
}
