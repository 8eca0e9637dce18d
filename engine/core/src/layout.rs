//! Adaptive Text Layout
//!
//! Placement and scrolling for the fixed-size input viewport, computed from
//! the measured glyph geometry of the current string.
//!
//! # Placement Rules
//!
//! - Placeholder (string empty): anchor Center at the viewport center.
//! - Content narrower than half the viewport (inclusive): anchor Right at
//!   the horizontal center, so the text grows leftward and short strings
//!   never sit off-center.
//! - Wider content: anchor Left at the viewport's left boundary for
//!   readable wrapped lines.
//! - More lines than fit: the anchor shifts up by one line pitch per
//!   overflowing line, keeping only the last lines visible
//!   (scroll-to-bottom).
//!
//! Measurement may lag a frame behind the string; the engine holds the
//! previous layout until geometry for the current string is ready.

use serde::{Deserialize, Serialize};

/// Horizontal anchor of rendered text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    /// The text's left edge sits at `pos_x`.
    Left,
    /// The text is centered on `pos_x`.
    Center,
    /// The text's right edge sits at `pos_x`.
    Right,
}

/// Measured bounding box of wrapped text, in viewport units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextBounds {
    /// Left edge.
    pub min_x: f32,
    /// Right edge.
    pub max_x: f32,
    /// Bottom edge.
    pub min_y: f32,
    /// Top edge.
    pub max_y: f32,
}

impl TextBounds {
    /// Measured width.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// Measured height.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

/// Geometry of the text viewport.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportParams {
    /// Wrapping width in world units.
    pub width: f32,
    /// Lines visible before scrolling starts.
    pub max_lines: u32,
    /// Vertical pitch of one line, matching the font.
    pub line_height: f32,
    /// Resting vertical offset of the text anchor.
    pub base_y: f32,
}

impl Default for ViewportParams {
    fn default() -> Self {
        Self {
            width: 58.0,
            max_lines: 4,
            line_height: 1.2,
            base_y: 0.0,
        }
    }
}

/// Computed placement for the current string.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextLayout {
    /// Horizontal anchor mode.
    pub anchor_x: Anchor,
    /// Horizontal anchor position.
    pub pos_x: f32,
    /// Vertical anchor position, including any scroll shift.
    pub pos_y: f32,
    /// Wrapped line count of the current string.
    pub line_count: u32,
}

/// Derives [`TextLayout`] from measured geometry; holds the last good
/// layout while measurement is unavailable.
#[derive(Clone, Copy, Debug)]
pub struct AdaptiveTextLayout {
    params: ViewportParams,
    current: TextLayout,
}

impl AdaptiveTextLayout {
    /// Create a layout engine for the given viewport, starting in the
    /// centered placeholder pose.
    #[must_use]
    pub fn new(params: ViewportParams) -> Self {
        Self {
            params,
            current: Self::placeholder_layout(&params),
        }
    }

    /// The viewport geometry.
    #[must_use]
    pub fn params(&self) -> ViewportParams {
        self.params
    }

    /// The most recently computed layout.
    #[must_use]
    pub fn layout(&self) -> TextLayout {
        self.current
    }

    /// Recompute for the current display string.
    ///
    /// `bounds` is `None` while the measurement collaborator has no
    /// geometry for the string yet; the previous layout holds until it is
    /// ready. Returns the (possibly unchanged) layout.
    pub fn update(&mut self, is_placeholder: bool, bounds: Option<TextBounds>) -> TextLayout {
        if is_placeholder {
            self.current = Self::placeholder_layout(&self.params);
            return self.current;
        }

        let Some(bounds) = bounds else {
            return self.current;
        };

        let half = self.params.width / 2.0;
        // Inclusive on the short side: a string exactly half as wide as the
        // viewport still grows leftward from center.
        let (anchor_x, pos_x) = if bounds.width() <= half {
            (Anchor::Right, 0.0)
        } else {
            (Anchor::Left, -half)
        };

        let line_count = (bounds.height() / self.params.line_height).ceil().max(0.0) as u32;
        let overflow = line_count.saturating_sub(self.params.max_lines);
        let pos_y = self.params.base_y + overflow as f32 * self.params.line_height;

        self.current = TextLayout {
            anchor_x,
            pos_x,
            pos_y,
            line_count,
        };
        self.current
    }

    fn placeholder_layout(params: &ViewportParams) -> TextLayout {
        TextLayout {
            anchor_x: Anchor::Center,
            pos_x: 0.0,
            pos_y: params.base_y,
            line_count: 1,
        }
    }
}

impl Default for AdaptiveTextLayout {
    fn default() -> Self {
        Self::new(ViewportParams::default())
    }
}
