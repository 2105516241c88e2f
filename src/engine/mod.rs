//! Document processing engine.
//!
//! Document-wide state (removal set, resolved fields, variant) is computed
//! once, then every page is reconstructed against it. Pages only share
//! read-only state, so they can be processed in parallel; results keep page
//! order either way.

mod options;

pub use options::EngineOptions;

use crate::boilerplate::{LineFrequencyAnalyzer, RemovalSet};
use crate::error::Result;
use crate::form::{FieldMap, FieldResolver};
use crate::model::{Document, Metadata, Page, RawTable};
use crate::render::{
    self, split_chunks, Chunk, OutputOptions, PageReconstructor, PageText, ReconstructionStats,
};
use crate::source::{FieldSource, FragmentSource, TableSource};
use crate::table::{LatticeDetector, QuestionRule, TableNormalizer};
use crate::variant::{Variant, VariantDetector};
use rayon::prelude::*;
use serde::Serialize;

/// Cleans documents with a fixed configuration.
#[derive(Debug, Clone)]
pub struct Engine {
    options: EngineOptions,
    analyzer: LineFrequencyAnalyzer,
    questions: QuestionRule,
    lattice: LatticeDetector,
}

impl Engine {
    /// Create an engine, rejecting invalid options up front.
    pub fn new(options: EngineOptions) -> Result<Self> {
        options.validate()?;
        let analyzer = LineFrequencyAnalyzer::new(options.boilerplate.clone())?;
        let questions = options.questions.rule()?;
        Ok(Self {
            options,
            analyzer,
            questions,
            lattice: LatticeDetector::new(),
        })
    }

    /// Options in use.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Materialize a document from collaborators and process it.
    pub fn process_sources(
        &self,
        fragments: &dyn FragmentSource,
        tables: &dyn TableSource,
        fields: &dyn FieldSource,
    ) -> Result<ProcessedDocument> {
        let document = Document::assemble(fragments, tables, fields)?;
        Ok(self.process(&document))
    }

    /// Process a document.
    pub fn process(&self, doc: &Document) -> ProcessedDocument {
        let removal = self.analyzer.analyze(&doc.pages);
        log::debug!("Removal set holds {} lines", removal.len());

        let raw_tables: Vec<Vec<RawTable>> = doc.pages.iter().map(|page| self.page_tables(page)).collect();

        let variant = VariantDetector::new(self.options.questions.clone()).resolve(
            self.options.variant_mode,
            &doc.pages,
            &raw_tables,
        );

        let fields = if self.options.resolve_form_fields {
            let mut tokens = self.options.fields.token_sequence();
            FieldResolver::new(&self.options.fields).resolve(&doc.fields, &doc.pages, &mut tokens)
        } else {
            FieldMap::default()
        };

        let mut normalizer = TableNormalizer::new(&self.options.tables);
        if variant.is_structured() {
            normalizer = normalizer.with_questions(self.questions.clone());
        }
        let reconstructor = PageReconstructor::new(&removal, &fields, self.options.boilerplate.band_height)
            .with_splicing(self.options.resolve_form_fields && self.options.fields.splice_tokens);

        let results: Vec<(PageText, ReconstructionStats)> = if self.options.parallel {
            doc.pages
                .par_iter()
                .zip(raw_tables.par_iter())
                .enumerate()
                .map(|(index, (page, raw))| render_page(&normalizer, &reconstructor, &fields, index, page, raw))
                .collect()
        } else {
            doc.pages
                .iter()
                .zip(raw_tables.iter())
                .enumerate()
                .map(|(index, (page, raw))| render_page(&normalizer, &reconstructor, &fields, index, page, raw))
                .collect()
        };

        let mut stats = ReconstructionStats::new();
        let mut pages = Vec::with_capacity(results.len());
        for (page, page_stats) in results {
            stats.merge(&page_stats);
            pages.push(page);
        }

        log::debug!(
            "Processed {} pages: {} fragments suppressed, {} tables, {} fields",
            stats.page_count,
            stats.suppressed_count,
            stats.table_count,
            stats.field_count
        );

        ProcessedDocument {
            metadata: doc.metadata.clone(),
            variant,
            question_marker: self.questions.marker().to_string(),
            pages,
            removal,
            fields,
            stats,
        }
    }

    /// Candidate tables of a page: the supplied ones, or grids built from
    /// its rulings when none were supplied.
    fn page_tables(&self, page: &Page) -> Vec<RawTable> {
        if !page.tables.is_empty() || !self.options.tables.lattice_fallback || page.rulings.is_empty() {
            return page.tables.clone();
        }
        let detected = self.lattice.detect(&page.rulings, &page.fragments);
        if !detected.is_empty() {
            log::debug!("Page {}: {} tables built from rulings", page.number, detected.len());
        }
        detected
    }
}

fn render_page(
    normalizer: &TableNormalizer,
    reconstructor: &PageReconstructor<'_>,
    fields: &FieldMap,
    index: usize,
    page: &Page,
    raw: &[RawTable],
) -> (PageText, ReconstructionStats) {
    let mut tables = normalizer.normalize(raw, &fields.on_page(index));
    let (text, stats) = reconstructor.render(page, index, &mut tables);
    (PageText::new(page.number, text), stats)
}

/// Result of processing a document.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedDocument {
    /// Document metadata
    pub metadata: Metadata,

    /// Variant the document was processed as
    pub variant: Variant,

    /// Marker opening each question in structured output
    #[serde(skip)]
    pub question_marker: String,

    /// Reconstructed pages in document order
    pub pages: Vec<PageText>,

    /// Lines removed as boilerplate
    pub removal: RemovalSet,

    /// Resolved form fields
    pub fields: FieldMap,

    /// Aggregated reconstruction counters
    pub stats: ReconstructionStats,
}

impl ProcessedDocument {
    /// Text of all pages.
    pub fn text(&self) -> String {
        render::to_text(&self.pages, &OutputOptions::default())
    }

    /// Text of the selected pages.
    pub fn to_text(&self, options: &OutputOptions) -> String {
        render::to_text(&self.pages, options)
    }

    /// Markdown output.
    pub fn to_markdown(&self, options: &OutputOptions) -> String {
        render::to_markdown(&self.metadata, &self.pages, options)
    }

    /// JSON output of the whole result.
    pub fn to_json(&self, options: &OutputOptions) -> Result<String> {
        render::to_json(self, options.json_format)
    }

    /// Split the output into one chunk per question.
    ///
    /// Documents processed as standard documents contain no markers and
    /// come back as a single chunk.
    pub fn chunks(&self) -> Vec<Chunk> {
        split_chunks(
            self.pages.iter().map(|page| (page.number, page.text.as_str())),
            &self.question_marker,
        )
    }

    /// Text of a page by number (1-based).
    pub fn page(&self, number: u32) -> Option<&str> {
        self.pages
            .iter()
            .find(|page| page.number == number)
            .map(|page| page.text.as_str())
    }
}
