//! Geometric layout of a document and spatial lookup over the result.
//!
//! Layout is a pure function of the document, the viewport size, the scroll
//! offset and the font metrics. It is recomputed wholesale after every change
//! and the hit-test index is rebuilt from it.
//!
//! ## Module Structure
//!
//! - [`geometry`] - `Geometry` sum type, containment and curve helpers
//! - [`engine`] - token wrapping and entity boxes
//! - [`relations`] - relation anchors, control points and labels
//! - [`hit_test`] - row-bucketed point lookup

mod engine;
pub mod geometry;
mod relations;

#[cfg(test)]
mod tests;

pub use engine::{layout, max_scroll, EntityBox, LayoutResult, TokenBox};
pub use geometry::Geometry;
pub use hit_test::{EntityHit, HitTestIndex, TokenHit};
pub use relations::{drag_curve, RelationGeometry};

/// Text measurement used by the layout engine
pub trait FontMetrics {
    /// Width of `text` set on one line
    fn text_width(&self, text: &str) -> f32;

    /// Height of one line of text
    fn line_height(&self) -> f32;
}

/// Fixed-advance metrics for headless layout
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMetrics {
    pub char_width: f32,
    pub line_height: f32,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            line_height: 16.0,
        }
    }
}

impl FontMetrics for MonospaceMetrics {
    fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.char_width
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }
}

/// Size of the visible document area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}
