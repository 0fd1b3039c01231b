//! Pointer input for the select tool: feeds presses, drags, releases,
//! double-clicks and the wheel into the gesture machine and editor session.

use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::constants::{DOUBLE_CLICK_SECONDS, DOUBLE_CLICK_SLOP};
use crate::network::{MapDirtyState, NetworkDocument};

use super::gesture::PointerButton;
use super::params::{is_cursor_over_ui, CursorPixel};
use super::session::{DoubleClick, EditorSession};
use super::EditorNotice;

/// Timestamp and position of the last primary click, for double-click
/// detection.
#[derive(Resource, Default)]
pub struct ClickTracker {
    last: Option<(f64, IVec2)>,
}

impl ClickTracker {
    /// Record a click. Returns true when it completes a double click; the
    /// third click of a quick series starts a new pair.
    pub fn register(&mut self, now: f64, point: IVec2) -> bool {
        let double = matches!(
            self.last,
            Some((time, previous))
                if now - time <= DOUBLE_CLICK_SECONDS
                    && (previous - point).abs().max_element() <= DOUBLE_CLICK_SLOP
        );
        self.last = if double { None } else { Some((now, point)) };
        double
    }
}

/// Keep the document viewport the size of the window.
pub fn sync_viewport_size(cursor: CursorPixel, mut doc: ResMut<NetworkDocument>) {
    let Some(size) = cursor.window_size() else {
        return;
    };
    if doc.viewport.width != size.x || doc.viewport.height != size.y {
        debug!("Viewport resized to {}x{}", size.x, size.y);
        doc.resize_viewport(size.x, size.y);
    }
}

#[allow(clippy::too_many_arguments)]
pub fn handle_pointer(
    mouse_button: Res<ButtonInput<MouseButton>>,
    time: Res<Time>,
    cursor: CursorPixel,
    mut contexts: EguiContexts,
    mut doc: ResMut<NetworkDocument>,
    mut session: ResMut<EditorSession>,
    mut clicks: ResMut<ClickTracker>,
    mut dirty: ResMut<MapDirtyState>,
    mut notice: ResMut<EditorNotice>,
) {
    let point = cursor.pixel();

    // Release is handled even when the cursor left the window
    if let Some(button) = session.gesture.button() {
        let released = match button {
            PointerButton::Primary => mouse_button.just_released(MouseButton::Left),
            PointerButton::Secondary => mouse_button.just_released(MouseButton::Right),
        };
        if released {
            // Pans count too: the viewport is saved with the map
            let committed = session.gesture.release(&mut doc);
            if committed {
                dirty.mark();
            }
            if !committed
                && button == PointerButton::Secondary
                && let Some(point) = point
                && let Some((line, index)) = session.gesture.secondary_click(&mut doc, point)
            {
                info!("Removed stop {} from {}", index, line);
                dirty.mark();
            }
            return;
        }
    }

    let Some(point) = point else {
        return;
    };

    if mouse_button.just_pressed(MouseButton::Left) || mouse_button.just_pressed(MouseButton::Right) {
        if is_cursor_over_ui(&mut contexts) {
            return;
        }

        if mouse_button.just_pressed(MouseButton::Right) {
            session.gesture.press(PointerButton::Secondary, point);
            return;
        }

        session.gesture.press(PointerButton::Primary, point);
        if clicks.register(time.elapsed_secs_f64(), point) {
            handle_double_click(&mut doc, &mut session, &mut dirty, &mut notice, point);
        }
        return;
    }

    if session.gesture.button().is_some() {
        session.gesture.drag(&mut doc, point);
    }
}

fn handle_double_click(
    doc: &mut NetworkDocument,
    session: &mut EditorSession,
    dirty: &mut MapDirtyState,
    notice: &mut EditorNotice,
    point: IVec2,
) {
    match session.double_click(doc, point) {
        Ok(DoubleClick::Recorded(pending, station)) => {
            info!("{} selected as {:?} station", station, pending);
        }
        Ok(DoubleClick::MergePrompt(station)) => {
            info!("Merge requested from {}", station);
        }
        Ok(DoubleClick::Merged(outcome)) => {
            info!(
                "{} replaced by {} on {}",
                outcome.target, outcome.source, outcome.line
            );
            dirty.mark();
        }
        Ok(DoubleClick::Zoomed(changed)) => {
            if changed {
                debug!("Zoomed in to level {}", doc.viewport.zoom);
            }
        }
        Ok(DoubleClick::Ignored) => {}
        Err(err) => {
            error!("Merge failed: {}", err);
            notice.show(format!("Merge failed: {}", err));
        }
    }
}

/// One zoom step per wheel notch, whatever the scroll unit.
fn wheel_steps(y: f32) -> i32 {
    if y > 0.0 {
        1
    } else if y < 0.0 {
        -1
    } else {
        0
    }
}

pub fn handle_wheel(
    mut scroll_events: MessageReader<MouseWheel>,
    cursor: CursorPixel,
    mut contexts: EguiContexts,
    mut doc: ResMut<NetworkDocument>,
    mut session: ResMut<EditorSession>,
    mut dirty: ResMut<MapDirtyState>,
) {
    if is_cursor_over_ui(&mut contexts) {
        scroll_events.clear();
        return;
    }
    let Some(point) = cursor.pixel() else {
        scroll_events.clear();
        return;
    };

    let steps: i32 = scroll_events
        .read()
        .map(|event| wheel_steps(event.y))
        .sum();

    if steps != 0 && session.gesture.wheel(&mut doc, steps, point) {
        dirty.mark();
        debug!("Zoom level {}", doc.viewport.zoom);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_quick_clicks_make_double_click() {
        let mut tracker = ClickTracker::default();
        assert!(!tracker.register(1.0, IVec2::new(100, 100)));
        assert!(tracker.register(1.2, IVec2::new(102, 99)));
    }

    #[test]
    fn test_slow_clicks_are_single() {
        let mut tracker = ClickTracker::default();
        assert!(!tracker.register(1.0, IVec2::new(100, 100)));
        assert!(!tracker.register(2.0, IVec2::new(100, 100)));
    }

    #[test]
    fn test_distant_clicks_are_single() {
        let mut tracker = ClickTracker::default();
        assert!(!tracker.register(1.0, IVec2::new(100, 100)));
        assert!(!tracker.register(1.1, IVec2::new(140, 100)));
    }

    #[test]
    fn test_wheel_steps() {
        assert_eq!(wheel_steps(3.0), 1);
        assert_eq!(wheel_steps(-0.2), -1);
        assert_eq!(wheel_steps(0.0), 0);
    }

    #[test]
    fn test_third_click_starts_new_pair() {
        let mut tracker = ClickTracker::default();
        tracker.register(1.0, IVec2::new(100, 100));
        assert!(tracker.register(1.1, IVec2::new(100, 100)));
        assert!(!tracker.register(1.2, IVec2::new(100, 100)));
        assert!(tracker.register(1.3, IVec2::new(100, 100)));
    }
}
