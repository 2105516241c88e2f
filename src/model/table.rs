//! Table types.

use super::Rect;
use serde::{Deserialize, Serialize};

/// A candidate table grid as reported by the table collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTable {
    /// Bounding rectangle (missing geometry disables containment checks)
    #[serde(default)]
    pub bounds: Option<Rect>,

    /// Cells in row-major order
    #[serde(default)]
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Create an empty table.
    pub fn new(bounds: Option<Rect>) -> Self {
        Self {
            bounds,
            rows: Vec::new(),
        }
    }

    /// Add a row of cells.
    pub fn add_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }

    /// Build a table from plain strings laid out on a regular grid.
    ///
    /// Cells are `cell_width` x `cell_height` starting at `origin`.
    pub fn from_grid<S: AsRef<str>>(
        origin: (f32, f32),
        cell_width: f32,
        cell_height: f32,
        rows: &[Vec<S>],
    ) -> Self {
        let (x, y) = origin;
        let mut table = RawTable::new(None);
        let mut width = 0usize;
        for (r, row) in rows.iter().enumerate() {
            width = width.max(row.len());
            let cells = row
                .iter()
                .enumerate()
                .map(|(c, text)| {
                    Cell::new(
                        text.as_ref(),
                        Rect::from_origin_size(
                            x + c as f32 * cell_width,
                            y + r as f32 * cell_height,
                            cell_width,
                            cell_height,
                        ),
                    )
                })
                .collect();
            table.add_row(cells);
        }
        table.bounds = Some(Rect::from_origin_size(
            x,
            y,
            width as f32 * cell_width,
            rows.len() as f32 * cell_height,
        ));
        table
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the widest row's cell count.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over every non-empty cell.
    pub fn non_empty_cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows.iter().flatten().filter(|c| !c.is_empty())
    }
}

/// A table cell.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cell {
    /// Cell rectangle
    #[serde(default)]
    pub rect: Option<Rect>,

    /// Raw cell text (may span several lines)
    #[serde(default)]
    pub text: String,
}

impl Cell {
    /// Create a cell with geometry.
    pub fn new(text: impl Into<String>, rect: Rect) -> Self {
        Self {
            rect: Some(rect),
            text: text.into(),
        }
    }

    /// Create a cell without geometry.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            rect: None,
            text: text.into(),
        }
    }

    /// Check if the cell carries no visible text.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// How a normalized table is emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    /// Delimited `| a | b |` rows
    #[default]
    Grid,
    /// Single-cell numbered question heading, emitted behind a marker
    Question,
}

/// A validated table ready for emission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedTable {
    /// Bounding rectangle
    pub bounds: Option<Rect>,

    /// Rendered block, newline terminated
    pub text: String,

    /// Emission style
    pub kind: TableKind,

    /// Set once the block has been emitted on its page
    #[serde(skip)]
    pub visited: bool,
}

impl NormalizedTable {
    /// Create a grid table block.
    pub fn grid(bounds: Option<Rect>, text: String) -> Self {
        Self {
            bounds,
            text,
            kind: TableKind::Grid,
            visited: false,
        }
    }

    /// Create a question heading block.
    pub fn question(bounds: Option<Rect>, text: String) -> Self {
        Self {
            bounds,
            text,
            kind: TableKind::Question,
            visited: false,
        }
    }

    /// Mark the table as emitted; returns `true` the first time only.
    pub fn mark_visited(&mut self) -> bool {
        !std::mem::replace(&mut self.visited, true)
    }
}
