//! Approximate text-fit model for text fields.
//!
//! No font metrics are available, so every glyph is assumed to be half the
//! font size wide and lines are spaced at 1.2 times the font size.

use crate::model::Rect;

/// Font size used when the default appearance does not name one.
pub const DEFAULT_FONT_SIZE: f32 = 12.0;

const LEADING_FACTOR: f32 = 1.2;
const CHAR_WIDTH_FACTOR: f32 = 0.5;
const HEIGHT_TOLERANCE: f32 = 1.2;

/// Font size from a default appearance string such as `/F3 10 Tf 0 g`.
///
/// Missing, unparseable and zero (auto) sizes fall back to
/// [`DEFAULT_FONT_SIZE`].
pub fn font_size(default_appearance: Option<&str>) -> f32 {
    let Some(da) = default_appearance else {
        return DEFAULT_FONT_SIZE;
    };
    let tokens: Vec<&str> = da.split_whitespace().collect();
    tokens
        .iter()
        .position(|token| *token == "Tf")
        .filter(|&idx| idx > 0)
        .and_then(|idx| tokens[idx - 1].parse::<f32>().ok())
        .filter(|size| size.is_finite() && *size > 0.0)
        .unwrap_or(DEFAULT_FONT_SIZE)
}

/// Number of rendered lines `text` needs in a box `width` wide.
pub fn estimate_lines(text: &str, width: f32, size: f32) -> usize {
    let char_width = size * CHAR_WIDTH_FACTOR;
    let lines: usize = text
        .lines()
        .map(|line| {
            let line_width = line.chars().count() as f32 * char_width;
            if width > 0.0 && line_width > width {
                (line_width / width).ceil() as usize
            } else {
                1
            }
        })
        .sum();
    lines.max(1)
}

/// Check whether `text` needs more height than the widget offers.
pub fn text_overflows(text: &str, rect: &Rect, default_appearance: Option<&str>) -> bool {
    if text.is_empty() {
        return false;
    }
    let size = font_size(default_appearance);
    let lines = estimate_lines(text, rect.width(), size);
    lines as f32 * size * LEADING_FACTOR > rect.height() + HEIGHT_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_size_from_da() {
        assert_eq!(font_size(Some("/F3 10 Tf 0 g")), 10.0);
        assert_eq!(font_size(Some("/Helv 8.5 Tf")), 8.5);
        assert_eq!(font_size(Some("/Helv 0 Tf 0 g")), DEFAULT_FONT_SIZE);
        assert_eq!(font_size(Some("/Helv x Tf")), DEFAULT_FONT_SIZE);
        assert_eq!(font_size(Some("Tf")), DEFAULT_FONT_SIZE);
        assert_eq!(font_size(None), DEFAULT_FONT_SIZE);
    }

    #[test]
    fn test_estimate_lines() {
        // 10pt font: 5pt per char, 20 chars = 100pt
        assert_eq!(estimate_lines("aaaaaaaaaaaaaaaaaaaa", 100.0, 10.0), 1);
        assert_eq!(estimate_lines("aaaaaaaaaaaaaaaaaaaaa", 100.0, 10.0), 2);
        assert_eq!(estimate_lines("a\nb\n", 100.0, 10.0), 2);
        assert_eq!(estimate_lines("a\n\nb", 100.0, 10.0), 3);
        assert_eq!(estimate_lines("", 100.0, 10.0), 1);
    }

    #[test]
    fn test_text_overflows() {
        // 10pt font, 12pt leading; one line fits in 12pt, tolerance 1.2
        let rect = Rect::new(0.0, 0.0, 100.0, 12.0);
        let da = Some("/F1 10 Tf 0 g");
        assert!(!text_overflows("short", &rect, da));
        assert!(text_overflows("one\ntwo", &rect, da));
        assert!(text_overflows(&"x".repeat(21), &rect, da));

        let tall = Rect::new(0.0, 0.0, 100.0, 24.0);
        assert!(!text_overflows("one\ntwo", &tall, da));
        assert!(!text_overflows("", &rect, da));
    }
}
