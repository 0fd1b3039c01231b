//! Centralized color theme for the application.
//!
//! This module provides all colors used throughout the editor UI and rendering.
//! Modify values here to change the application's color scheme.

use bevy::prelude::Color;
use bevy_egui::egui;

// ============================================================================
// Network Colors
// ============================================================================

/// Station circle outline
pub const STATION_COLOR: Color = Color::srgb(0.1, 0.1, 0.1);

/// Station being dragged or captured for a merge
pub const STATION_ACTIVE: Color = Color::srgb(1.0, 0.7, 0.2);

/// Stations lying between the start and end station of the drafted event
pub const EVENT_RANGE_HIGHLIGHT: Color = Color::srgb(1.0, 0.1, 0.1);

/// Area rectangle outline
pub const AREA_OUTLINE: Color = Color::srgba(0.2, 0.6, 1.0, 0.9);

/// Area hatching lines
pub const AREA_FILL: Color = Color::srgba(0.2, 0.6, 1.0, 0.15);

/// Line color palette, cycled by line id
pub fn line_palette() -> [(Color, &'static str); 8] {
    [
        (Color::srgb(0.85, 0.1, 0.1), "Red"),
        (Color::srgb(0.1, 0.3, 0.85), "Blue"),
        (Color::srgb(0.0, 0.65, 0.2), "Green"),
        (Color::srgb(0.95, 0.6, 0.0), "Orange"),
        (Color::srgb(0.55, 0.1, 0.6), "Purple"),
        (Color::srgb(0.0, 0.65, 0.7), "Teal"),
        (Color::srgb(0.6, 0.4, 0.2), "Brown"),
        (Color::srgb(0.9, 0.3, 0.6), "Pink"),
    ]
}

/// Color of a palette slot (wraps around the palette)
pub fn line_color(palette_index: usize) -> Color {
    let palette = line_palette();
    palette[palette_index % palette.len()].0
}

/// Display name of a palette slot
pub fn line_color_name(palette_index: usize) -> &'static str {
    let palette = line_palette();
    palette[palette_index % palette.len()].1
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

    /// Amber for validation warnings
    pub const WARNING_TEXT: egui::Color32 = egui::Color32::from_rgb(230, 170, 40);
}

// ============================================================================
// Color Conversion Utilities
// ============================================================================

/// Convert a Bevy Color to egui Color32 (fully opaque)
pub fn bevy_to_egui_opaque(color: Color) -> egui::Color32 {
    let srgba = color.to_srgba();
    egui::Color32::from_rgba_unmultiplied(
        (srgba.red * 255.0) as u8,
        (srgba.green * 255.0) as u8,
        (srgba.blue * 255.0) as u8,
        255,
    )
}
