//! Page Stream Reconstructor.
//!
//! One forward pass over a page's fragments. Each fragment is, in order of
//! precedence, swallowed by the table whose bounds contain it (the table
//! block is emitted the first time), suppressed as boilerplate, replaced by
//! a form-field value, or emitted as is.
//!
//! Boilerplate is matched on whole region lines first, the same way the
//! analyzer counted them, so a running header split into word fragments is
//! dropped as a unit. Single fragments are still matched on their own.

use super::cleanup::finish_page;
use super::{EmitSink, ReconstructionStats};
use crate::boilerplate::{region_lines, RemovalSet};
use crate::form::FieldMap;
use crate::layout::RegionLayout;
use crate::model::{FormField, NormalizedTable, Page, TextFragment};

/// Vertical distance within which a spliced token joins an existing line.
pub const SPLICE_LINE_TOLERANCE: f32 = 3.0;

/// Rebuilds the text of single pages from document-wide state.
#[derive(Debug, Clone, Copy)]
pub struct PageReconstructor<'a> {
    removal: &'a RemovalSet,
    fields: &'a FieldMap,
    band_height: f32,
    splice_tokens: bool,
}

impl<'a> PageReconstructor<'a> {
    /// Create a reconstructor sharing the document's removal set and fields.
    pub fn new(removal: &'a RemovalSet, fields: &'a FieldMap, band_height: f32) -> Self {
        Self {
            removal,
            fields,
            band_height,
            splice_tokens: false,
        }
    }

    /// Insert field tokens into the fragment stream before reconstruction.
    pub fn with_splicing(mut self, enabled: bool) -> Self {
        self.splice_tokens = enabled;
        self
    }

    /// Reconstruct a page into its final text.
    ///
    /// `page_index` is the 0-based position of the page in the document.
    pub fn render(
        &self,
        page: &Page,
        page_index: usize,
        tables: &mut [NormalizedTable],
    ) -> (String, ReconstructionStats) {
        let mut raw = String::new();
        let mut stats = self.reconstruct(page, page_index, tables, &mut raw);
        let text = finish_page(&raw);
        stats.count_text(&text);
        (text, stats)
    }

    /// Emit the raw, unprocessed stream of a page into `sink`.
    pub fn reconstruct<S: EmitSink>(
        &self,
        page: &Page,
        page_index: usize,
        tables: &mut [NormalizedTable],
        sink: &mut S,
    ) -> ReconstructionStats {
        let layout = RegionLayout::new(page.media_box, self.band_height);
        let spliced;
        let fragments: &[TextFragment] = if self.splice_tokens {
            spliced = splice_tokens(&page.fragments, &self.fields.on_page(page_index));
            &spliced
        } else {
            &page.fragments
        };

        let line_suppressed = self.boilerplate_fragments(fragments, &layout);

        let mut stats = ReconstructionStats {
            page_count: 1,
            ..Default::default()
        };
        let mut current_line = None;
        let mut line_has_text = false;

        for (idx, fragment) in fragments.iter().enumerate() {
            stats.fragment_count += 1;
            if current_line != Some(fragment.line) {
                if current_line.is_some() {
                    sink.emit("\n");
                }
                current_line = Some(fragment.line);
                line_has_text = false;
            }

            let anchor = fragment.anchor();
            if let Some(table) = tables
                .iter_mut()
                .find(|table| table.bounds.is_some_and(|bounds| bounds.contains(anchor)))
            {
                stats.table_fragment_count += 1;
                if table.mark_visited() {
                    sink.emit("\n");
                    sink.emit(&table.text);
                    stats.table_count += 1;
                    line_has_text = false;
                }
                continue;
            }

            if line_suppressed[idx] || self.removal.suppresses(&fragment.text, anchor, &layout) {
                stats.suppressed_count += 1;
                continue;
            }

            let text = match self.fields.by_token(fragment.text.trim()) {
                Some(field) => {
                    stats.field_count += 1;
                    field.text.trim()
                }
                None => fragment.text.as_str(),
            };

            if line_has_text {
                sink.emit(" ");
            }
            sink.emit(text);
            line_has_text = true;
        }

        log::debug!(
            "Page {}: {} fragments, {} suppressed, {} tables, {} fields",
            page.number,
            stats.fragment_count,
            stats.suppressed_count,
            stats.table_count,
            stats.field_count
        );
        stats
    }

    /// Flags, parallel to `fragments`, marking members of region lines
    /// whose joined text is removed in that region.
    fn boilerplate_fragments(&self, fragments: &[TextFragment], layout: &RegionLayout) -> Vec<bool> {
        let mut flags = vec![false; fragments.len()];
        if self.removal.is_empty() {
            return flags;
        }
        for line in region_lines(fragments, layout) {
            if self.removal.suppresses_in(&line.text, line.region) {
                for idx in line.members {
                    flags[idx] = true;
                }
            }
        }
        flags
    }
}

/// Merge one synthetic token fragment per field into a reading-order
/// stream.
///
/// A token whose top edge is within [`SPLICE_LINE_TOLERANCE`] of an existing
/// line joins that line at its x position; otherwise it opens a new line
/// before the first fragment below it.
pub fn splice_tokens(fragments: &[TextFragment], fields: &[&FormField]) -> Vec<TextFragment> {
    let mut output = fragments.to_vec();
    let mut next_line = fragments.iter().map(|f| f.line + 1).max().unwrap_or(0);

    let mut ordered: Vec<&FormField> = fields.to_vec();
    ordered.sort_by(|a, b| {
        a.rect
            .top
            .total_cmp(&b.rect.top)
            .then(a.rect.x0.total_cmp(&b.rect.x0))
    });

    for field in ordered {
        let (x, y) = (field.rect.x0, field.rect.top);
        let same_line = output
            .iter()
            .find(|f| (f.y - y).abs() <= SPLICE_LINE_TOLERANCE)
            .map(|f| (f.line, f.y));

        match same_line {
            Some((line, line_y)) => {
                let pos = output
                    .iter()
                    .rposition(|f| f.line == line && f.x <= x)
                    .map(|idx| idx + 1)
                    .or_else(|| output.iter().position(|f| f.line == line))
                    .unwrap_or(output.len());
                output.insert(pos, TextFragment::new(field.token.clone(), x, line_y, line));
            }
            None => {
                let pos = output
                    .iter()
                    .position(|f| f.y > y)
                    .unwrap_or(output.len());
                output.insert(pos, TextFragment::new(field.token.clone(), x, y, next_line));
                next_line += 1;
            }
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boilerplate::{region_lines, RemovalSet};
    use crate::form::{FieldResolver, TokenSequence};
    use crate::layout::RegionName;
    use crate::model::{FieldKind, FieldSpec, Rect, Widget};
    use crate::render::Recorder;

    fn empty_fields() -> FieldMap {
        FieldMap::default()
    }

    #[test]
    fn test_lines_and_spaces() {
        let mut page = Page::letter(1);
        page.add_fragment(TextFragment::new("Hello", 72.0, 100.0, 0));
        page.add_fragment(TextFragment::new("world", 110.0, 100.0, 0));
        page.add_fragment(TextFragment::new("Next", 72.0, 115.0, 1));

        let removal = RemovalSet::default();
        let fields = empty_fields();
        let (text, stats) = PageReconstructor::new(&removal, &fields, 75.0).render(&page, 0, &mut []);

        assert_eq!(text, "Hello world\nNext\n");
        assert_eq!(stats.fragment_count, 3);
        assert_eq!(stats.word_count, 3);
    }

    #[test]
    fn test_positional_suppression() {
        let mut page = Page::letter(1);
        page.push_line("7", 300.0, 30.0);
        page.push_line("Body mentions", 72.0, 300.0);
        page.push_line("7", 300.0, 320.0);

        let mut removal = RemovalSet::new(true);
        removal.insert("7", [RegionName::Header]);
        let fields = empty_fields();
        let mut raw = String::new();
        let stats = PageReconstructor::new(&removal, &fields, 75.0).reconstruct(&page, 0, &mut [], &mut raw);

        assert_eq!(raw, "\nBody mentions\n7");
        assert_eq!(stats.suppressed_count, 1);
    }

    #[test]
    fn test_word_fragments_suppressed_as_a_line() {
        let mut page = Page::letter(1);
        page.add_fragment(TextFragment::new("ACME", 72.0, 30.0, 0));
        page.add_fragment(TextFragment::new("Corp", 110.0, 30.0, 0));
        page.add_fragment(TextFragment::new("Body", 72.0, 300.0, 1));
        page.add_fragment(TextFragment::new("ACME", 72.0, 320.0, 2));
        page.add_fragment(TextFragment::new("Corp", 110.0, 320.0, 2));
        page.add_fragment(TextFragment::new("ACME", 72.0, 760.0, 3));
        page.add_fragment(TextFragment::new("Corp", 110.0, 760.0, 3));

        let mut removal = RemovalSet::new(true);
        removal.insert("ACME Corp", [RegionName::Header]);
        let fields = empty_fields();
        let (text, stats) = PageReconstructor::new(&removal, &fields, 75.0).render(&page, 0, &mut []);

        // only the header occurrence is removed
        assert_eq!(text, "Body
ACME Corp
ACME Corp
");
        assert_eq!(stats.suppressed_count, 2);
    }

    #[test]
    fn test_table_emitted_once() {
        let mut page = Page::letter(1);
        page.push_line("Before", 72.0, 90.0);
        page.add_fragment(TextFragment::new("a", 110.0, 105.0, 1));
        page.add_fragment(TextFragment::new("b", 210.0, 105.0, 1));
        page.add_fragment(TextFragment::new("c", 110.0, 125.0, 2));
        page.push_line("After", 72.0, 200.0);

        let mut tables = vec![NormalizedTable::grid(
            Some(Rect::new(100.0, 100.0, 300.0, 140.0)),
            "| a | b |\n|---|---|\n| c | d |\n".to_string(),
        )];
        let removal = RemovalSet::default();
        let fields = empty_fields();
        let (text, stats) = PageReconstructor::new(&removal, &fields, 75.0).render(&page, 0, &mut tables);

        assert_eq!(text, "Before\n\n| a | b |\n|---|---|\n| c | d |\n\nAfter\n");
        assert_eq!(text.matches("| a | b |").count(), 1);
        assert_eq!(stats.table_count, 1);
        assert_eq!(stats.table_fragment_count, 3);
        assert!(tables[0].visited);
    }

    #[test]
    fn test_table_emission_sequence() {
        let mut page = Page::letter(1);
        page.add_fragment(TextFragment::new("a", 110.0, 105.0, 0));
        page.add_fragment(TextFragment::new("b", 210.0, 105.0, 0));
        page.add_fragment(TextFragment::new("c", 110.0, 125.0, 1));

        let mut tables = vec![NormalizedTable::grid(
            Some(Rect::new(100.0, 100.0, 300.0, 140.0)),
            "| a | b |\n|---|---|\n| c | d |\n".to_string(),
        )];
        let removal = RemovalSet::default();
        let fields = empty_fields();
        let mut recorder = Recorder::default();
        PageReconstructor::new(&removal, &fields, 75.0).reconstruct(&page, 0, &mut tables, &mut recorder);

        assert_eq!(recorder.pieces, vec!["\n", "| a | b |\n|---|---|\n| c | d |\n", "\n"]);
    }

    #[test]
    fn test_table_without_geometry_contains_nothing() {
        let mut page = Page::letter(1);
        page.add_fragment(TextFragment::new("a", 110.0, 105.0, 0));
        page.add_fragment(TextFragment::new("b", 210.0, 105.0, 0));

        let mut tables = vec![NormalizedTable::grid(None, "| a | b |\n".to_string())];
        let removal = RemovalSet::default();
        let fields = empty_fields();
        let (text, stats) = PageReconstructor::new(&removal, &fields, 75.0).render(&page, 0, &mut tables);

        assert_eq!(text, "a b\n");
        assert_eq!(stats.table_count, 0);
        assert!(!tables[0].visited);
    }

    #[test]
    fn test_token_substitution() {
        let spec = FieldSpec::new("name", FieldKind::Text)
            .with_value("  Jane Doe ")
            .with_widget(Widget::new(Rect::new(200.0, 100.0, 400.0, 114.0), 0));
        let pages = vec![Page::letter(1)];
        let fields = FieldResolver::default().resolve(&[spec], &pages, &mut TokenSequence::default());

        let mut page = Page::letter(1);
        page.add_fragment(TextFragment::new("Name:", 72.0, 100.0, 0));
        page.add_fragment(TextFragment::new("@@FIELD_1@@", 200.0, 100.0, 0));
        page.add_fragment(TextFragment::new("@@FIELD_1@@x", 72.0, 120.0, 1));

        let removal = RemovalSet::default();
        let (text, stats) = PageReconstructor::new(&removal, &fields, 75.0).render(&page, 0, &mut []);
        assert_eq!(text, "Name: Jane Doe\n@@FIELD_1@@x\n");
        assert_eq!(stats.field_count, 1);
    }

    #[test]
    fn test_empty_page() {
        let removal = RemovalSet::default();
        let fields = empty_fields();
        let (text, _) = PageReconstructor::new(&removal, &fields, 75.0).render(&Page::letter(1), 0, &mut []);
        assert_eq!(text, "");
    }

    #[test]
    fn test_splice_tokens() {
        let fragments = vec![
            TextFragment::new("Name:", 72.0, 100.0, 0),
            TextFragment::new("Notes", 72.0, 300.0, 1),
        ];
        let same_line = FormField {
            name: "name".into(),
            kind: FieldKind::Text,
            rect: Rect::new(150.0, 99.0, 300.0, 113.0),
            page_index: 0,
            text: "Jane".into(),
            token: "@@FIELD_1@@".into(),
            overflows: false,
        };
        let own_line = FormField {
            rect: Rect::new(72.0, 200.0, 300.0, 260.0),
            token: "@@FIELD_2@@".into(),
            ..same_line.clone()
        };

        let spliced = splice_tokens(&fragments, &[&own_line, &same_line]);
        let texts: Vec<(&str, u32)> = spliced.iter().map(|f| (f.text.as_str(), f.line)).collect();
        assert_eq!(
            texts,
            vec![
                ("Name:", 0),
                ("@@FIELD_1@@", 0),
                ("@@FIELD_2@@", 2),
                ("Notes", 1),
            ]
        );
    }

    #[test]
    fn test_reconstruct_with_splicing() {
        let spec = FieldSpec::new("agree", FieldKind::Checkbox)
            .with_value("Yes")
            .with_widget(Widget::new(Rect::new(60.0, 100.0, 70.0, 110.0), 0));
        let pages = vec![Page::letter(1)];
        let fields = FieldResolver::default().resolve(&[spec], &pages, &mut TokenSequence::default());

        let mut page = Page::letter(1);
        page.add_fragment(TextFragment::new("I agree", 72.0, 100.0, 0));

        let removal = RemovalSet::default();
        let (text, _) = PageReconstructor::new(&removal, &fields, 75.0)
            .with_splicing(true)
            .render(&page, 0, &mut []);
        assert_eq!(text, "[x] I agree\n");
    }
}
