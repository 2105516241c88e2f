//! Table validation, cleanup and delimited rendering.

use crate::error::Result;
use crate::model::{FormField, NormalizedTable, RawTable, Rect};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Default pattern for numbered question headings ("2.1 What is KYC?").
pub const DEFAULT_QUESTION_PATTERN: &str = r"^\d+(\.\d+)*\.?\s+\S";

/// Options for table handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    /// Emit a `|---|` separator after the first row
    pub with_header_separator: bool,

    /// Build grids from page rulings when no tables were supplied
    pub lattice_fallback: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            with_header_separator: true,
            lattice_fallback: true,
        }
    }
}

impl TableOptions {
    /// Enable or disable the header separator.
    pub fn with_header_separator(mut self, enabled: bool) -> Self {
        self.with_header_separator = enabled;
        self
    }

    /// Enable or disable ruling-based detection.
    pub fn with_lattice_fallback(mut self, enabled: bool) -> Self {
        self.lattice_fallback = enabled;
        self
    }
}

/// How single-cell question tables are recognized and emitted.
#[derive(Debug, Clone)]
pub struct QuestionRule {
    pattern: Regex,
    marker: String,
}

impl QuestionRule {
    /// Compile a rule from a heading pattern and an emission marker.
    pub fn new(pattern: &str, marker: impl Into<String>) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            marker: marker.into(),
        })
    }

    /// Marker emitted before each heading.
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Check whether a cell text is a numbered heading.
    pub fn is_heading(&self, text: &str) -> bool {
        self.pattern.is_match(text.trim())
    }
}

/// Turns candidate grids into emit-ready blocks.
#[derive(Debug, Clone)]
pub struct TableNormalizer {
    with_header_separator: bool,
    questions: Option<QuestionRule>,
}

impl TableNormalizer {
    /// Create a normalizer for grid tables.
    pub fn new(options: &TableOptions) -> Self {
        Self {
            with_header_separator: options.with_header_separator,
            questions: None,
        }
    }

    /// Also recognize single-cell question tables.
    pub fn with_questions(mut self, rule: QuestionRule) -> Self {
        self.questions = Some(rule);
        self
    }

    /// Normalize the tables of one page.
    ///
    /// `fields` are the resolved form fields on the same page; fields fully
    /// inside a cell replace its text. Invalid tables are dropped.
    pub fn normalize(&self, tables: &[RawTable], fields: &[&FormField]) -> Vec<NormalizedTable> {
        let normalized: Vec<NormalizedTable> = tables
            .iter()
            .enumerate()
            .filter_map(|(idx, table)| {
                let result = self.normalize_table(table, fields);
                if result.is_none() {
                    log::debug!(
                        "Discarding table {} ({} rows, {} columns)",
                        idx,
                        table.row_count(),
                        table.column_count()
                    );
                }
                result
            })
            .collect();

        if normalized.is_empty() && !tables.is_empty() {
            log::debug!("No valid tables among {} candidates", tables.len());
        }
        normalized
    }

    /// Normalize a single table, or `None` if it is not a valid table.
    pub fn normalize_table(&self, table: &RawTable, fields: &[&FormField]) -> Option<NormalizedTable> {
        let bounds = table_bounds(table);

        if let Some(rule) = &self.questions {
            if let Some(heading) = question_heading(table, rule) {
                return Some(NormalizedTable::question(
                    bounds,
                    format!("{}{}\n", rule.marker, heading),
                ));
            }
        }

        let grid = resolve_cells(table, fields);
        if !is_valid(&grid) {
            return None;
        }
        let grid = trim_grid(grid);
        if grid.is_empty() {
            return None;
        }
        Some(NormalizedTable::grid(bounds, self.render(&grid)))
    }

    /// Render a cleaned grid as `| a | b |` rows.
    pub fn render(&self, grid: &[Vec<String>]) -> String {
        let columns = grid.iter().map(Vec::len).max().unwrap_or(0);
        let mut output = String::new();
        let mut first = true;

        for row in grid {
            if row_is_empty(row) {
                continue;
            }
            for idx in 0..columns {
                output.push_str("| ");
                output.push_str(row.get(idx).map(String::as_str).unwrap_or(""));
                output.push(' ');
            }
            output.push_str("|\n");

            if first {
                if self.with_header_separator {
                    output.push_str(&"|---".repeat(columns));
                    output.push_str("|\n");
                }
                first = false;
            }
        }
        output
    }
}

/// Check the table validity rule on a raw table, ignoring form fields.
pub fn is_valid_table(table: &RawTable) -> bool {
    is_valid(&resolve_cells(table, &[]))
}

/// Replace line breaks with single spaces.
pub fn collapse_newlines(text: &str) -> String {
    text.split(['\r', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn table_bounds(table: &RawTable) -> Option<Rect> {
    table.bounds.or_else(|| {
        table
            .rows
            .iter()
            .flatten()
            .filter_map(|cell| cell.rect)
            .reduce(|acc, rect| acc.union(&rect))
    })
}

fn question_heading(table: &RawTable, rule: &QuestionRule) -> Option<String> {
    let mut cells = table.non_empty_cells();
    let only = cells.next()?;
    if cells.next().is_some() || !rule.is_heading(&only.text) {
        return None;
    }
    Some(collapse_newlines(&only.text))
}

/// Cell texts with form-field values substituted.
///
/// Tokens of fields already placed in a cell are stripped from the raw text
/// of every later cell.
fn resolve_cells(table: &RawTable, fields: &[&FormField]) -> Vec<Vec<String>> {
    let mut placed: Vec<&str> = Vec::new();

    table
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| {
                    let inside: Vec<&FormField> = match cell.rect {
                        Some(rect) => fields
                            .iter()
                            .copied()
                            .filter(|field| rect.encloses(&field.rect))
                            .collect(),
                        None => Vec::new(),
                    };

                    if inside.is_empty() {
                        let mut text = cell.text.clone();
                        for &token in &placed {
                            if text.contains(token) {
                                text = text.replace(token, "");
                            }
                        }
                        collapse_newlines(&text)
                    } else {
                        placed.extend(inside.iter().map(|field| field.token.as_str()));
                        let values: Vec<&str> = inside.iter().map(|field| field.text.as_str()).collect();
                        collapse_newlines(&values.join(" "))
                    }
                })
                .collect()
        })
        .collect()
}

fn row_is_empty(row: &[String]) -> bool {
    row.iter().all(|cell| cell.is_empty())
}

/// More than one row with content, and at least one row with two or more
/// filled cells.
fn is_valid(grid: &[Vec<String>]) -> bool {
    if grid.len() <= 1 {
        return false;
    }
    let filled = |row: &Vec<String>| row.iter().filter(|cell| !cell.is_empty()).count();
    grid.iter().filter(|row| filled(row) > 0).count() > 1 && grid.iter().any(|row| filled(row) > 1)
}

/// Drop trailing empty columns and rows; pad short rows.
fn trim_grid(mut grid: Vec<Vec<String>>) -> Vec<Vec<String>> {
    let columns = grid.iter().map(Vec::len).max().unwrap_or(0);
    let used = (0..columns)
        .rev()
        .find(|&col| grid.iter().any(|row| row.get(col).is_some_and(|c| !c.is_empty())))
        .map(|col| col + 1)
        .unwrap_or(0);

    for row in &mut grid {
        row.resize(used, String::new());
    }
    while grid.last().is_some_and(|row| row_is_empty(row)) {
        grid.pop();
    }
    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Cell, FieldKind};

    fn normalizer() -> TableNormalizer {
        TableNormalizer::new(&TableOptions::default())
    }

    fn field(text: &str, token: &str, rect: Rect) -> FormField {
        FormField {
            name: "f".to_string(),
            kind: FieldKind::Checkbox,
            rect,
            page_index: 0,
            text: text.to_string(),
            token: token.to_string(),
            overflows: false,
        }
    }

    #[test]
    fn test_render_with_separator() {
        let table = RawTable::from_grid((0.0, 0.0), 50.0, 20.0, &[vec!["Name", "Role"], vec!["Ann", "CEO"]]);
        let result = normalizer().normalize_table(&table, &[]).unwrap();

        assert_eq!(result.text, "| Name | Role |\n|---|---|\n| Ann | CEO |\n");
        assert_eq!(result.bounds, table.bounds);
    }

    #[test]
    fn test_render_without_separator() {
        let options = TableOptions::default().with_header_separator(false);
        let table = RawTable::from_grid((0.0, 0.0), 50.0, 20.0, &[vec!["a", "b"], vec!["c", "d"]]);
        let result = TableNormalizer::new(&options).normalize_table(&table, &[]).unwrap();
        assert_eq!(result.text, "| a | b |\n| c | d |\n");
    }

    #[test]
    fn test_rejects_invalid_tables() {
        let n = normalizer();
        // single row
        let table = RawTable::from_grid((0.0, 0.0), 10.0, 10.0, &[vec!["a", "b"]]);
        assert!(n.normalize_table(&table, &[]).is_none());
        // single column
        let table = RawTable::from_grid((0.0, 0.0), 10.0, 10.0, &[vec!["a"], vec!["b"]]);
        assert!(n.normalize_table(&table, &[]).is_none());
        // only one row has content
        let table = RawTable::from_grid((0.0, 0.0), 10.0, 10.0, &[vec!["a", "b"], vec!["", " "]]);
        assert!(n.normalize_table(&table, &[]).is_none());
    }

    #[test]
    fn test_trims_trailing_columns_and_rows() {
        let table = RawTable::from_grid(
            (0.0, 0.0),
            10.0,
            10.0,
            &[
                vec!["a", "b", ""],
                vec!["", "", ""],
                vec!["c", "d\nmore", ""],
                vec!["", "", ""],
            ],
        );
        let result = normalizer().normalize_table(&table, &[]).unwrap();
        assert_eq!(result.text, "| a | b |\n|---|---|\n| c | d more |\n");
    }

    #[test]
    fn test_checkbox_in_cell() {
        let table = RawTable::from_grid((100.0, 100.0), 100.0, 20.0, &[vec!["", "Agree"], vec!["No", "Disagree"]]);
        let checkbox = field("[x]", "@@F1@@", Rect::new(105.0, 103.0, 115.0, 113.0));

        let result = normalizer().normalize_table(&table, &[&checkbox]).unwrap();
        assert!(result.text.starts_with("| [x] | Agree |\n"));
    }

    #[test]
    fn test_placed_tokens_stripped_from_later_cells() {
        let mut table = RawTable::new(Some(Rect::new(0.0, 0.0, 200.0, 40.0)));
        table.add_row(vec![
            Cell::new("", Rect::new(0.0, 0.0, 100.0, 20.0)),
            Cell::new("Label", Rect::new(100.0, 0.0, 200.0, 20.0)),
        ]);
        table.add_row(vec![
            Cell::new("x", Rect::new(0.0, 20.0, 100.0, 40.0)),
            Cell::new("@@F1@@ spill", Rect::new(100.0, 20.0, 200.0, 40.0)),
        ]);
        let text = field("Long answer", "@@F1@@", Rect::new(2.0, 2.0, 98.0, 18.0));

        let result = normalizer().normalize_table(&table, &[&text]).unwrap();
        assert_eq!(result.text, "| Long answer | Label |\n|---|---|\n| x | spill |\n");
    }

    #[test]
    fn test_question_table() {
        let rule = QuestionRule::new(DEFAULT_QUESTION_PATTERN, "§§QUESTION§§").unwrap();
        let n = normalizer().with_questions(rule);

        let table = RawTable::from_grid((0.0, 0.0), 300.0, 20.0, &[vec!["2.1 What is KYC?"]]);
        let result = n.normalize_table(&table, &[]).unwrap();
        assert_eq!(result.kind, crate::model::TableKind::Question);
        assert_eq!(result.text, "§§QUESTION§§2.1 What is KYC?\n");

        // without question mode the same table is rejected
        assert!(normalizer().normalize_table(&table, &[]).is_none());
    }

    #[test]
    fn test_question_requires_single_heading_cell() {
        let rule = QuestionRule::new(DEFAULT_QUESTION_PATTERN, "#Q#").unwrap();
        assert!(rule.is_heading("12. Sanctions"));
        assert!(rule.is_heading("3 Ownership"));
        assert!(!rule.is_heading("Ownership"));
        assert!(!rule.is_heading("2.1"));

        let n = normalizer().with_questions(rule);
        let table = RawTable::from_grid((0.0, 0.0), 100.0, 20.0, &[vec!["Ownership"], vec!["details"]]);
        assert!(n.normalize_table(&table, &[]).is_none());
    }

    #[test]
    fn test_bounds_from_cells() {
        let mut table = RawTable::new(None);
        table.add_row(vec![
            Cell::new("a", Rect::new(0.0, 0.0, 10.0, 10.0)),
            Cell::new("b", Rect::new(10.0, 0.0, 20.0, 10.0)),
        ]);
        table.add_row(vec![
            Cell::new("c", Rect::new(0.0, 10.0, 10.0, 20.0)),
            Cell::new("d", Rect::new(10.0, 10.0, 20.0, 20.0)),
        ]);
        let result = normalizer().normalize_table(&table, &[]).unwrap();
        assert_eq!(result.bounds, Some(Rect::new(0.0, 0.0, 20.0, 20.0)));
    }

    #[test]
    fn test_normalize_drops_invalid() {
        let good = RawTable::from_grid((0.0, 0.0), 10.0, 10.0, &[vec!["a", "b"], vec!["c", "d"]]);
        let bad = RawTable::from_grid((0.0, 0.0), 10.0, 10.0, &[vec!["only"]]);
        assert_eq!(normalizer().normalize(&[bad, good], &[]).len(), 1);
    }

    #[test]
    fn test_is_valid_table() {
        let valid = RawTable::from_grid((0.0, 0.0), 10.0, 10.0, &[vec!["a", "b"], vec!["c", ""]]);
        let invalid = RawTable::from_grid((0.0, 0.0), 10.0, 10.0, &[vec!["a"], vec!["c"]]);
        assert!(is_valid_table(&valid));
        assert!(!is_valid_table(&invalid));
    }

    #[test]
    fn test_collapse_newlines() {
        assert_eq!(collapse_newlines(" a\r\nb \n\n c "), "a b c");
        assert_eq!(collapse_newlines(""), "");
    }
}
