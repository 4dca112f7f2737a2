//! Centralized constants used across the application.
//!
//! This module contains magic numbers and configuration values that are used
//! in multiple places or would benefit from being named constants.

/// Default window width in pixels
pub const DEFAULT_WINDOW_WIDTH: f32 = 1400.0;

/// Default window height in pixels
pub const DEFAULT_WINDOW_HEIGHT: f32 = 900.0;

/// Maximum number of recent collection files to remember in config
pub const MAX_RECENT_FILES: usize = 10;

/// Default undo journal depth
pub const MAX_UNDO_HISTORY: usize = 50;

/// Upper bound accepted for a configured undo depth
pub const MAX_UNDO_HISTORY_LIMIT: usize = 500;

// ============================================================================
// Document layout
// ============================================================================

/// Left edge of the first token on each line
pub const MARGIN_LEFT: f32 = 10.0;

/// Top of the first line
pub const MARGIN_TOP: f32 = 10.0;

/// Space kept free at the right edge before wrapping
pub const MARGIN_RIGHT: f32 = 10.0;

/// Horizontal padding added to each measured token width
pub const TOKEN_PADDING: f32 = 4.0;

/// Horizontal gap between neighbouring tokens
pub const TOKEN_GAP: f32 = 2.0;

/// Vertical padding added to the font line height
pub const LINE_PADDING: f32 = 8.0;

/// Extra vertical space before each sentence after the first
pub const SENTENCE_GAP: f32 = 10.0;

/// Space below the last line
pub const BOTTOM_PADDING: f32 = 20.0;

/// Distance above the higher endpoint at which a relation label sits
pub const LABEL_OFFSET: f32 = 15.0;

/// Relation labels never go closer than this to the viewport top
pub const LABEL_MIN_TOP: f32 = 25.0;

/// Horizontal padding inside a relation label box
pub const LABEL_PADDING: f32 = 4.0;

/// Endpoints closer than this vertically get an upward-bowing curve
pub const CURVE_FLAT_THRESHOLD: f32 = 50.0;

/// Upper bound on how far a curve bows
pub const CURVE_MAX_HEIGHT: f32 = 100.0;

/// Lower bound on the bow when the viewport top limits it
pub const CURVE_MIN_HEIGHT: f32 = 20.0;

/// Control points stay this far inside the viewport
pub const VIEWPORT_INSET: f32 = 10.0;

/// Line segments used to draw a relation curve
pub const CURVE_SEGMENTS: usize = 30;

/// Arrow head length in pixels
pub const ARROW_SIZE: f32 = 10.0;

/// Geometry this far outside the viewport is still drawn
pub const VIEWPORT_BUFFER: f32 = 200.0;

// ============================================================================
// Scrolling
// ============================================================================

/// Pixels scrolled per mouse wheel notch
pub const SCROLL_STEP: f32 = 30.0;

/// Pixels per PageUp / PageDown
pub const PAGE_SCROLL_STEP: f32 = 100.0;

/// Documents skipped by Ctrl+Left / Ctrl+Right
pub const NAVIGATION_JUMP: isize = 10;
