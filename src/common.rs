//! Common types shared across multiple modules.
//!
//! This module contains types that are used by both the network model and the
//! editor gestures to avoid code duplication.

use bevy::window::{CursorIcon, SystemCursorIcon};

/// One edge of an area rectangle.
///
/// Used by the area model (which edge to move), the hit-tester (which edge is
/// under the pointer) and the gesture machine (which edge is latched).
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum BorderSide {
    Left,
    Right,
    Top,
    Bottom,
}

impl BorderSide {
    /// Order in which border hits are tested.
    pub const HIT_ORDER: [BorderSide; 4] = [
        BorderSide::Top,
        BorderSide::Bottom,
        BorderSide::Left,
        BorderSide::Right,
    ];

    /// Get the appropriate cursor icon for resizing from this edge.
    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            BorderSide::Top | BorderSide::Bottom => CursorIcon::System(SystemCursorIcon::NsResize),
            BorderSide::Left | BorderSide::Right => CursorIcon::System(SystemCursorIcon::EwResize),
        }
    }

    /// Whether the edge moves along the x axis.
    pub fn is_horizontal_axis(&self) -> bool {
        matches!(self, BorderSide::Left | BorderSide::Right)
    }

    pub fn label(&self) -> &'static str {
        match self {
            BorderSide::Left => "left",
            BorderSide::Right => "right",
            BorderSide::Top => "top",
            BorderSide::Bottom => "bottom",
        }
    }
}
