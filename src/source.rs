//! Collaborator interfaces.
//!
//! Glyph extraction, table detection and form enumeration live outside this
//! crate. Each is modelled as a small trait so any extractor can feed the
//! engine; [`Document`] implements all three over its own contents.

use crate::error::{Error, Result};
use crate::model::{Document, FieldSpec, Page, RawTable, Rect, Ruling, TextFragment};

/// Supplies positioned text for each page.
pub trait FragmentSource {
    /// Number of pages.
    fn page_count(&self) -> usize;

    /// Bounding rectangle of a page (0-based index).
    fn page_bounds(&self, index: usize) -> Result<Rect>;

    /// Fragments of a page in stable reading order.
    fn fragments(&self, index: usize) -> Result<Vec<TextFragment>>;

    /// Vector ruling segments of a page.
    fn rulings(&self, _index: usize) -> Result<Vec<Ruling>> {
        Ok(Vec::new())
    }

    /// Ids of the widget annotations placed on a page.
    fn annotations(&self, _index: usize) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

/// Supplies candidate table grids for a page.
pub trait TableSource {
    /// Candidate tables of `page`.
    fn tables(&self, page: &Page) -> Result<Vec<RawTable>>;
}

/// Supplies the interactive form fields of a document.
pub trait FieldSource {
    /// All form fields.
    fn fields(&self) -> Result<Vec<FieldSpec>>;
}

impl Document {
    fn page_at(&self, index: usize) -> Result<&Page> {
        self.pages
            .get(index)
            .ok_or(Error::PageOutOfRange(index as u32 + 1, self.page_count()))
    }

    /// Materialize a document from arbitrary collaborators.
    pub fn assemble(
        fragments: &dyn FragmentSource,
        tables: &dyn TableSource,
        fields: &dyn FieldSource,
    ) -> Result<Document> {
        let mut document = Document::new();
        for index in 0..fragments.page_count() {
            let mut page = Page::new(index as u32 + 1, fragments.page_bounds(index)?);
            page.fragments = fragments.fragments(index)?;
            page.rulings = fragments.rulings(index)?;
            page.annotations = fragments.annotations(index)?;
            page.tables = tables.tables(&page)?;
            document.add_page(page);
        }
        document.fields = fields.fields()?;

        log::debug!(
            "Assembled document: {} pages, {} fields",
            document.pages.len(),
            document.fields.len()
        );
        Ok(document)
    }
}

impl FragmentSource for Document {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_bounds(&self, index: usize) -> Result<Rect> {
        Ok(self.page_at(index)?.media_box)
    }

    fn fragments(&self, index: usize) -> Result<Vec<TextFragment>> {
        Ok(self.page_at(index)?.fragments.clone())
    }

    fn rulings(&self, index: usize) -> Result<Vec<Ruling>> {
        Ok(self.page_at(index)?.rulings.clone())
    }

    fn annotations(&self, index: usize) -> Result<Vec<String>> {
        Ok(self.page_at(index)?.annotations.clone())
    }
}

/// Tables that came with the page itself.
impl TableSource for Document {
    fn tables(&self, page: &Page) -> Result<Vec<RawTable>> {
        Ok(page.tables.clone())
    }
}

impl FieldSource for Document {
    fn fields(&self) -> Result<Vec<FieldSpec>> {
        Ok(self.fields.clone())
    }
}
