//! Centralized color theme for the application.
//!
//! This module provides all colors used by the document canvas and the egui
//! panels. Label colors come from the settings when configured and from
//! [`color_for`] otherwise.

use bevy::prelude::Color;
use bevy_egui::egui;
use std::collections::BTreeMap;

/// Window clear color behind the egui panels
pub const CLEAR_COLOR: Color = Color::srgb(0.973, 0.976, 0.98);

// ============================================================================
// Label Colors
// ============================================================================

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Deterministic color for a label.
///
/// Hashes the label with 32-bit FNV-1a and maps three derived values into
/// the 50..250 range of each channel, so colors are never near black or white.
pub fn color_for(label: &str) -> egui::Color32 {
    let hash = label.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
    });
    let channel = |multiplier: u32| (hash.wrapping_mul(multiplier) % 200 + 50) as u8;
    egui::Color32::from_rgb(channel(1), channel(2), channel(3))
}

/// Configured color for `label`, falling back to the hashed one
pub fn label_color(configured: &BTreeMap<String, [u8; 3]>, label: &str) -> egui::Color32 {
    match configured.get(label) {
        Some([r, g, b]) => egui::Color32::from_rgb(*r, *g, *b),
        None => color_for(label),
    }
}

/// Blend `color` toward white by `factor` (0.0 keeps it, 1.0 is white)
pub fn lighten(color: egui::Color32, factor: f32) -> egui::Color32 {
    let factor = factor.clamp(0.0, 1.0);
    let mix = |c: u8| (f32::from(c) + (255.0 - f32::from(c)) * factor).round() as u8;
    egui::Color32::from_rgb(mix(color.r()), mix(color.g()), mix(color.b()))
}

// ============================================================================
// Canvas Colors
// ============================================================================

pub mod canvas {
    use bevy_egui::egui;

    /// White document background
    pub const BACKGROUND: egui::Color32 = egui::Color32::WHITE;

    /// Dark grey token text
    pub const TOKEN_TEXT: egui::Color32 = egui::Color32::from_rgb(33, 37, 41);

    /// Translucent yellow behind selected tokens
    pub const TOKEN_SELECTION: egui::Color32 =
        egui::Color32::from_rgba_premultiplied(120, 110, 28, 120);

    /// Blue outline around the selected entity
    pub const ENTITY_SELECTED: egui::Color32 = egui::Color32::from_rgb(13, 110, 253);

    /// Dashed line while a relation is being dragged
    pub const RELATION_DRAG: egui::Color32 = egui::Color32::from_rgb(108, 117, 125);

    /// Relation label background
    pub const RELATION_LABEL_FILL: egui::Color32 = egui::Color32::WHITE;
}

// ============================================================================
// UI Colors (egui)
// ============================================================================

pub mod ui {
    use bevy_egui::egui;

    /// Grey for help/hint text
    pub const HINT_TEXT: egui::Color32 = egui::Color32::GRAY;

    /// Red for error messages
    pub const ERROR_TEXT: egui::Color32 = egui::Color32::RED;

    /// Green for success messages
    pub const SUCCESS_TEXT: egui::Color32 = egui::Color32::from_rgb(25, 135, 84);

    /// Amber for warnings
    pub const WARNING_TEXT: egui::Color32 = egui::Color32::from_rgb(204, 154, 5);

    /// Semi-transparent black overlay for modal dialogs
    pub const MODAL_OVERLAY: egui::Color32 = egui::Color32::from_black_alpha(100);

    /// Orange dot marking unsaved changes
    pub const UNSAVED_MARKER: egui::Color32 = egui::Color32::from_rgb(255, 152, 0);
}
