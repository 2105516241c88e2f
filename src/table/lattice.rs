//! Ruling-based table detection.
//!
//! Horizontal and vertical rulings are intersected, every grid square whose
//! corners and sides are all present becomes a cell, and cells sharing an
//! edge are grouped into tables. Fragments are assigned to the cell containing their anchor.

use crate::error::Result;
use crate::model::geometry::{approx_eq, EPSILON};
use crate::model::{Cell, Page, RawTable, Rect, Ruling, TextFragment};
use crate::source::TableSource;
use std::collections::HashMap;

/// Builds candidate grids from a page's ruling segments.
#[derive(Debug, Clone)]
pub struct LatticeDetector {
    tolerance: f32,
    min_length: f32,
}

impl Default for LatticeDetector {
    fn default() -> Self {
        Self {
            tolerance: EPSILON,
            min_length: 2.0,
        }
    }
}

impl LatticeDetector {
    /// Create a detector with the default tolerance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tolerance used to classify rulings and match corners.
    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance.max(0.0);
        self
    }

    /// Detect tables from rulings and fill them with the page's text.
    pub fn detect(&self, rulings: &[Ruling], fragments: &[TextFragment]) -> Vec<RawTable> {
        let (horizontals, verticals) = self.classify(rulings);
        if horizontals.len() < 2 || verticals.len() < 2 {
            return Vec::new();
        }

        let corners = self.intersections(&horizontals, &verticals);
        let cells = self.cells(&corners, &horizontals, &verticals);
        let tables: Vec<RawTable> = group_cells(cells)
            .into_iter()
            .map(|group| self.build_table(group, fragments))
            .collect();

        log::debug!(
            "Lattice: {} horizontal, {} vertical rulings -> {} tables",
            horizontals.len(),
            verticals.len(),
            tables.len()
        );
        tables
    }

    /// Split rulings into horizontal and vertical segments, normalized so
    /// that `from` is the left or top end. Diagonals are dropped.
    fn classify(&self, rulings: &[Ruling]) -> (Vec<Ruling>, Vec<Ruling>) {
        let mut horizontals = Vec::new();
        let mut verticals = Vec::new();

        for ruling in rulings {
            let (a, b) = (ruling.from, ruling.to);
            if (a.y - b.y).abs() <= self.tolerance && (a.x - b.x).abs() >= self.min_length {
                let y = (a.y + b.y) / 2.0;
                horizontals.push(Ruling::horizontal(a.x.min(b.x), a.x.max(b.x), y));
            } else if (a.x - b.x).abs() <= self.tolerance && (a.y - b.y).abs() >= self.min_length {
                let x = (a.x + b.x) / 2.0;
                verticals.push(Ruling::vertical(x, a.y.min(b.y), a.y.max(b.y)));
            }
        }
        (horizontals, verticals)
    }

    fn intersections(&self, horizontals: &[Ruling], verticals: &[Ruling]) -> Vec<(f32, f32)> {
        let tol = self.tolerance;
        let mut points: Vec<(f32, f32)> = Vec::new();

        for h in horizontals {
            let y = h.from.y;
            for v in verticals {
                let x = v.from.x;
                if x >= h.from.x - tol && x <= h.to.x + tol && y >= v.from.y - tol && y <= v.to.y + tol {
                    let seen = points
                        .iter()
                        .any(|&(px, py)| (px - x).abs() <= tol && (py - y).abs() <= tol);
                    if !seen {
                        points.push((x, y));
                    }
                }
            }
        }
        points
    }

    /// Grid squares whose four corners exist and whose four sides are drawn.
    fn cells(&self, corners: &[(f32, f32)], horizontals: &[Ruling], verticals: &[Ruling]) -> Vec<Rect> {
        let xs = distinct(corners.iter().map(|p| p.0), self.tolerance);
        let ys = distinct(corners.iter().map(|p| p.1), self.tolerance);
        let tol = self.tolerance;
        let has = |x: f32, y: f32| {
            corners
                .iter()
                .any(|&(px, py)| (px - x).abs() <= tol && (py - y).abs() <= tol)
        };

        let mut cells = Vec::new();
        for pair_y in ys.windows(2) {
            for pair_x in xs.windows(2) {
                let (x0, x1, top, bottom) = (pair_x[0], pair_x[1], pair_y[0], pair_y[1]);
                let corners_found = has(x0, top) && has(x1, top) && has(x0, bottom) && has(x1, bottom);
                let sides_drawn = self.spans_horizontally(horizontals, top, x0, x1)
                    && self.spans_horizontally(horizontals, bottom, x0, x1)
                    && self.spans_vertically(verticals, x0, top, bottom)
                    && self.spans_vertically(verticals, x1, top, bottom);
                if corners_found && sides_drawn {
                    cells.push(Rect::new(x0, top, x1, bottom));
                }
            }
        }
        cells
    }

    fn spans_horizontally(&self, horizontals: &[Ruling], y: f32, x0: f32, x1: f32) -> bool {
        let tol = self.tolerance;
        horizontals.iter().any(|h| {
            (h.from.y - y).abs() <= tol && h.from.x <= x0 + tol && h.to.x >= x1 - tol
        })
    }

    fn spans_vertically(&self, verticals: &[Ruling], x: f32, top: f32, bottom: f32) -> bool {
        let tol = self.tolerance;
        verticals.iter().any(|v| {
            (v.from.x - x).abs() <= tol && v.from.y <= top + tol && v.to.y >= bottom - tol
        })
    }

    fn build_table(&self, cells: Vec<Rect>, fragments: &[TextFragment]) -> RawTable {
        let bounds = cells.iter().copied().reduce(|acc, rect| acc.union(&rect));
        let mut table = RawTable::new(bounds);

        let tops = distinct(cells.iter().map(|c| c.top), self.tolerance);
        for top in tops {
            let mut row: Vec<Rect> = cells
                .iter()
                .copied()
                .filter(|c| approx_eq(c.top, top))
                .collect();
            row.sort_by(|a, b| a.x0.total_cmp(&b.x0));
            table.add_row(
                row.into_iter()
                    .map(|rect| Cell::new(cell_text(&rect, fragments), rect))
                    .collect(),
            );
        }
        table
    }
}

impl TableSource for LatticeDetector {
    fn tables(&self, page: &Page) -> Result<Vec<RawTable>> {
        Ok(self.detect(&page.rulings, &page.fragments))
    }
}

/// Sorted values with near-duplicates merged.
fn distinct(values: impl Iterator<Item = f32>, tolerance: f32) -> Vec<f32> {
    let mut sorted: Vec<f32> = values.filter(|v| v.is_finite()).collect();
    sorted.sort_by(f32::total_cmp);
    let mut result: Vec<f32> = Vec::new();
    for value in sorted {
        match result.last() {
            Some(&last) if (value - last).abs() <= tolerance => {}
            _ => result.push(value),
        }
    }
    result
}

/// Text of the fragments anchored inside a cell; same-line fragments are
/// joined by a space, lines by a newline.
fn cell_text(rect: &Rect, fragments: &[TextFragment]) -> String {
    let mut text = String::new();
    let mut current_line = None;
    for fragment in fragments.iter().filter(|f| rect.contains(f.anchor())) {
        match current_line {
            Some(line) if line == fragment.line => text.push(' '),
            Some(_) => text.push('\n'),
            None => {}
        }
        text.push_str(&fragment.text);
        current_line = Some(fragment.line);
    }
    text
}

/// Group cells that share an edge (union-find).
fn group_cells(cells: Vec<Rect>) -> Vec<Vec<Rect>> {
    fn find(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    let n = cells.len();
    let mut parent: Vec<usize> = (0..n).collect();
    for i in 0..n {
        for j in (i + 1)..n {
            if share_edge(&cells[i], &cells[j]) {
                let (ri, rj) = (find(&mut parent, i), find(&mut parent, j));
                if ri != rj {
                    parent[rj] = ri;
                }
            }
        }
    }

    let mut order: Vec<usize> = Vec::new();
    let mut groups: HashMap<usize, Vec<Rect>> = HashMap::new();
    for (i, cell) in cells.iter().enumerate() {
        let root = find(&mut parent, i);
        if !groups.contains_key(&root) {
            order.push(root);
        }
        groups.entry(root).or_default().push(*cell);
    }

    let mut tables: Vec<Vec<Rect>> = order
        .into_iter()
        .filter_map(|root| groups.remove(&root))
        .collect();
    tables.sort_by(|a, b| {
        let (ta, tb) = (a[0], b[0]);
        ta.top.total_cmp(&tb.top).then(ta.x0.total_cmp(&tb.x0))
    });
    tables
}

fn share_edge(a: &Rect, b: &Rect) -> bool {
    let vertical = (approx_eq(a.x1, b.x0) || approx_eq(a.x0, b.x1))
        && a.top < b.bottom + EPSILON
        && b.top < a.bottom + EPSILON;
    let horizontal = (approx_eq(a.bottom, b.top) || approx_eq(a.top, b.bottom))
        && a.x0 < b.x1 + EPSILON
        && b.x0 < a.x1 + EPSILON;
    vertical || horizontal
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2x2 grid: x in {100, 200, 300}, y in {100, 120, 140}
    fn grid_rulings() -> Vec<Ruling> {
        let mut rulings = Vec::new();
        for y in [100.0, 120.0, 140.0] {
            rulings.push(Ruling::horizontal(100.0, 300.0, y));
        }
        for x in [100.0, 200.0, 300.0] {
            rulings.push(Ruling::vertical(x, 100.0, 140.0));
        }
        rulings
    }

    #[test]
    fn test_detect_grid() {
        let fragments = vec![
            TextFragment::new("Name", 110.0, 105.0, 0),
            TextFragment::new("Role", 210.0, 105.0, 0),
            TextFragment::new("Ann", 110.0, 125.0, 1),
            TextFragment::new("CEO", 210.0, 125.0, 1),
            TextFragment::new("Outside", 110.0, 400.0, 2),
        ];
        let tables = LatticeDetector::new().detect(&grid_rulings(), &fragments);

        assert_eq!(tables.len(), 1);
        let table = &tables[0];
        assert_eq!(table.bounds, Some(Rect::new(100.0, 100.0, 300.0, 140.0)));
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[0][0].text, "Name");
        assert_eq!(table.rows[0][1].text, "Role");
        assert_eq!(table.rows[1][1].text, "CEO");
    }

    #[test]
    fn test_near_axis_rulings_are_classified() {
        // slightly skewed segments still count as horizontal or vertical
        let mut rulings = grid_rulings();
        rulings[0] = Ruling::new(100.0, 100.2, 300.0, 99.9);
        rulings[3] = Ruling::new(100.3, 100.0, 100.0, 140.0);

        let tables = LatticeDetector::new().detect(&rulings, &[]);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].row_count(), 2);
        assert_eq!(tables[0].column_count(), 2);
    }

    #[test]
    fn test_diagonals_and_sparse_rulings_ignored() {
        let rulings = vec![
            Ruling::new(0.0, 0.0, 100.0, 100.0),
            Ruling::horizontal(0.0, 100.0, 50.0),
            Ruling::vertical(50.0, 0.0, 100.0),
        ];
        assert!(LatticeDetector::new().detect(&rulings, &[]).is_empty());
    }

    #[test]
    fn test_separate_tables() {
        let mut rulings = grid_rulings();
        for y in [500.0, 520.0] {
            rulings.push(Ruling::horizontal(100.0, 200.0, y));
        }
        for x in [100.0, 200.0] {
            rulings.push(Ruling::vertical(x, 500.0, 520.0));
        }

        let tables = LatticeDetector::new().detect(&rulings, &[]);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[1].bounds, Some(Rect::new(100.0, 500.0, 200.0, 520.0)));
    }

    #[test]
    fn test_table_source_impl() {
        let mut page = Page::letter(1);
        page.rulings = grid_rulings();
        page.add_fragment(TextFragment::new("A", 110.0, 105.0, 0));

        let tables = LatticeDetector::new().tables(&page).unwrap();
        assert_eq!(tables[0].rows[0][0].text, "A");
    }

    #[test]
    fn test_multiline_cell_text() {
        let fragments = vec![
            TextFragment::new("first", 110.0, 103.0, 0),
            TextFragment::new("half", 140.0, 103.0, 0),
            TextFragment::new("second", 110.0, 112.0, 1),
        ];
        let tables = LatticeDetector::new().detect(&grid_rulings(), &fragments);
        assert_eq!(tables[0].rows[0][0].text, "first half\nsecond");
    }
}
