//! Text Measurement
//!
//! Trait seam for the text-measurement collaborator, plus a monospace
//! glyph-grid reference implementation for surfaces without a font
//! rasterizer.

use textwrap::wrap;
use unicode_width::UnicodeWidthStr;

use crate::layout::TextBounds;

/// Measures the bounding box of a string after wrapping at a maximum width.
///
/// Real rendering backends measure asynchronously, so geometry for the
/// current string may not exist yet - `measure` returns `None` in that case
/// and the layout engine holds its previous result.
pub trait TextMeasurer: Send {
    /// Measure `text` wrapped at `max_width` viewport units.
    fn measure(&self, text: &str, max_width: f32) -> Option<TextBounds>;
}

/// Glyph-grid measurer: every glyph cell is `cell_width` wide and lines sit
/// `line_height` apart, the way a monospace face lays out.
#[derive(Clone, Copy, Debug)]
pub struct MonospaceMeasurer {
    /// Horizontal advance of one glyph cell.
    pub cell_width: f32,
    /// Vertical pitch of one line.
    pub line_height: f32,
}

impl MonospaceMeasurer {
    /// Create a measurer with the given cell geometry.
    #[must_use]
    pub fn new(cell_width: f32, line_height: f32) -> Self {
        Self {
            cell_width,
            line_height,
        }
    }
}

impl TextMeasurer for MonospaceMeasurer {
    fn measure(&self, text: &str, max_width: f32) -> Option<TextBounds> {
        if text.is_empty() {
            return Some(TextBounds {
                min_x: 0.0,
                max_x: 0.0,
                min_y: 0.0,
                max_y: 0.0,
            });
        }

        let columns = ((max_width / self.cell_width).floor() as usize).max(1);
        let lines = wrap(text, columns);
        let widest = lines
            .iter()
            .map(|line| UnicodeWidthStr::width(line.as_ref()))
            .max()
            .unwrap_or(0);

        Some(TextBounds {
            min_x: 0.0,
            max_x: widest as f32 * self.cell_width,
            min_y: -(lines.len() as f32) * self.line_height,
            max_y: 0.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_width() {
        let measurer = MonospaceMeasurer::new(1.0, 1.2);
        let bounds = measurer.measure("hello", 58.0).unwrap();
        assert!((bounds.width() - 5.0).abs() < 1e-6);
        assert!((bounds.height() - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_wrapping_adds_lines() {
        let measurer = MonospaceMeasurer::new(1.0, 1.2);
        // Ten columns: "aaaa bbbb cccc" wraps onto three lines.
        let bounds = measurer.measure("aaaa bbbb cccc", 10.0).unwrap();
        assert!((bounds.height() - 3.0 * 1.2).abs() < 1e-6);
        assert!(bounds.width() <= 10.0);
    }

    #[test]
    fn test_empty_string_has_zero_bounds() {
        let measurer = MonospaceMeasurer::new(1.0, 1.2);
        let bounds = measurer.measure("", 58.0).unwrap();
        assert_eq!(bounds.width(), 0.0);
        assert_eq!(bounds.height(), 0.0);
    }

    #[test]
    fn test_wide_glyphs_count_double() {
        let measurer = MonospaceMeasurer::new(1.0, 1.2);
        let bounds = measurer.measure("ねこ", 58.0).unwrap();
        assert!((bounds.width() - 4.0).abs() < 1e-6);
    }
}
