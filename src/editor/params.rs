//! Common SystemParam bundles to reduce parameter counts in editor systems.
//!
//! ## Available Bundles
//!
//! - [`CursorPixel`]: Primary window access for the cursor in window pixels
//!
//! ## Helper Functions
//!
//! - [`is_cursor_over_ui`]: Check if cursor is over egui UI (for input gating)

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::EguiContexts;

/// Bundled window query for cursor position in window pixels (top-left
/// origin), the space the network model works in.
#[derive(SystemParam)]
pub struct CursorPixel<'w, 's> {
    pub window: Query<'w, 's, &'static Window, With<PrimaryWindow>>,
}

impl CursorPixel<'_, '_> {
    /// Cursor position rounded to whole pixels, if the cursor is in the window
    pub fn pixel(&self) -> Option<IVec2> {
        let window = self.window.single().ok()?;
        window.cursor_position().map(|p| p.round().as_ivec2())
    }

    /// Logical window size in whole pixels
    pub fn window_size(&self) -> Option<IVec2> {
        let window = self.window.single().ok()?;
        Some(IVec2::new(window.width().round() as i32, window.height().round() as i32))
    }
}

/// Check if the cursor is over egui UI
pub fn is_cursor_over_ui(contexts: &mut EguiContexts) -> bool {
    contexts
        .ctx_mut()
        .map(|ctx| ctx.is_pointer_over_area())
        .unwrap_or(false)
}
