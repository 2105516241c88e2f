//! Page-level types.

use super::{Point, RawTable, Rect};
use serde::{Deserialize, Serialize};

/// A single page as materialized by the extraction collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Page bounds in points
    pub media_box: Rect,

    /// Positioned text fragments in reading order
    #[serde(default)]
    pub fragments: Vec<TextFragment>,

    /// Candidate tables reported by the table collaborator
    #[serde(default)]
    pub tables: Vec<RawTable>,

    /// Vector ruling segments drawn on the page
    #[serde(default)]
    pub rulings: Vec<Ruling>,

    /// Ids of the widget annotations placed on this page
    #[serde(default)]
    pub annotations: Vec<String>,
}

impl Page {
    /// Create a new empty page with the given bounds.
    pub fn new(number: u32, media_box: Rect) -> Self {
        Self {
            number,
            media_box,
            fragments: Vec::new(),
            tables: Vec::new(),
            rulings: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// Create a new page with standard Letter size.
    pub fn letter(number: u32) -> Self {
        Self::new(number, Rect::letter())
    }

    /// Create a new page with standard A4 size.
    pub fn a4(number: u32) -> Self {
        Self::new(number, Rect::a4())
    }

    /// Append a fragment at the end of the reading order.
    pub fn add_fragment(&mut self, fragment: TextFragment) {
        self.fragments.push(fragment);
    }

    /// Append a fragment on a new line below the previous one.
    pub fn push_line(&mut self, text: impl Into<String>, x: f32, y: f32) {
        let line = self.fragments.last().map(|f| f.line + 1).unwrap_or(0);
        self.fragments.push(TextFragment::new(text, x, y, line));
    }

    /// Add a candidate table.
    pub fn add_table(&mut self, table: RawTable) {
        self.tables.push(table);
    }

    /// Plain text of the page: fragments of a line joined by spaces,
    /// lines joined by newlines.
    pub fn plain_text(&self) -> String {
        let mut output = String::new();
        let mut current_line = None;
        for fragment in &self.fragments {
            match current_line {
                Some(line) if line == fragment.line => output.push(' '),
                Some(_) => output.push('\n'),
                None => {}
            }
            output.push_str(&fragment.text);
            current_line = Some(fragment.line);
        }
        output
    }

    /// Check if the page carries no text.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Page dimensions as (width, height).
    pub fn dimensions(&self) -> (f32, f32) {
        (self.media_box.width(), self.media_box.height())
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::letter(1)
    }
}

/// A run of text with the position of its first glyph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    /// Fragment text
    pub text: String,
    /// X position of the first glyph
    pub x: f32,
    /// Y position of the first glyph (from the top edge)
    pub y: f32,
    /// Id of the line (baseline group) the fragment belongs to
    #[serde(default)]
    pub line: u32,
}

impl TextFragment {
    /// Create a new fragment.
    pub fn new(text: impl Into<String>, x: f32, y: f32, line: u32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            line,
        }
    }

    /// Anchor position of the fragment.
    pub fn anchor(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A straight vector segment, as drawn by `m`/`l` path operators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ruling {
    /// Start point
    pub from: Point,
    /// End point
    pub to: Point,
}

impl Ruling {
    /// Create a ruling between two points.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self {
            from: Point::new(x0, y0),
            to: Point::new(x1, y1),
        }
    }

    /// Horizontal rule spanning `x0..x1` at `y`.
    pub fn horizontal(x0: f32, x1: f32, y: f32) -> Self {
        Self::new(x0, y, x1, y)
    }

    /// Vertical rule spanning `top..bottom` at `x`.
    pub fn vertical(x: f32, top: f32, bottom: f32) -> Self {
        Self::new(x, top, x, bottom)
    }
}
