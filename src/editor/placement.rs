use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::constants::{DEFAULT_AREA_HEIGHT, DEFAULT_AREA_WIDTH};
use crate::network::{AreaRect, MapDirtyState, NetworkDocument};

use super::hit_test;
use super::params::{is_cursor_over_ui, CursorPixel};
use super::tools::{CurrentTool, EditorTool, LineBuilder};
use super::EditorNotice;

/// Platform assigned to stops added with the line tool
const DEFAULT_PLATFORM: u32 = 1;

#[allow(clippy::too_many_arguments)]
pub fn handle_placement(
    mouse_button: Res<ButtonInput<MouseButton>>,
    current_tool: Res<CurrentTool>,
    builder: Res<LineBuilder>,
    cursor: CursorPixel,
    mut contexts: EguiContexts,
    mut doc: ResMut<NetworkDocument>,
    mut dirty: ResMut<MapDirtyState>,
    mut notice: ResMut<EditorNotice>,
) {
    if current_tool.tool == EditorTool::Select {
        return;
    }

    if !mouse_button.just_pressed(MouseButton::Left) {
        return;
    }

    // Don't place if clicking on UI
    if is_cursor_over_ui(&mut contexts) {
        return;
    }

    let Some(point) = cursor.pixel() else {
        return;
    };

    match current_tool.tool {
        EditorTool::Select => {}
        EditorTool::Station => match doc.add_station(point) {
            Ok(id) => {
                info!("Placed {}", id);
                dirty.mark();
            }
            Err(err) => {
                warn!("Cannot place station: {}", err);
                notice.show(format!("Cannot place station: {}", err));
            }
        },
        EditorTool::Area => {
            let rect = AreaRect::new(point.x, point.y, DEFAULT_AREA_WIDTH, DEFAULT_AREA_HEIGHT);
            match doc.add_area(rect) {
                Ok(id) => {
                    info!("Placed {}", id);
                    dirty.mark();
                }
                Err(err) => {
                    warn!("Cannot place area: {}", err);
                    notice.show(format!("Cannot place area: {}", err));
                }
            }
        }
        EditorTool::Line => {
            let Some(line) = builder.active else {
                notice.show("Press Enter to start a new line".to_string());
                return;
            };
            let Some(station) = hit_test::station_at(&doc, point) else {
                return;
            };
            match doc.append_to_line(line, station, DEFAULT_PLATFORM) {
                Ok(()) => {
                    debug!("Appended {} to {}", station, line);
                    dirty.mark();
                }
                Err(err) => {
                    warn!("Cannot extend line: {}", err);
                    notice.show(format!("Cannot extend line: {}", err));
                }
            }
        }
    }
}

/// Enter starts a new line for the line tool, Escape finishes it.
pub fn handle_line_keys(
    keyboard: Res<ButtonInput<KeyCode>>,
    current_tool: Res<CurrentTool>,
    mut builder: ResMut<LineBuilder>,
    mut doc: ResMut<NetworkDocument>,
    mut dirty: ResMut<MapDirtyState>,
    mut contexts: EguiContexts,
) {
    if current_tool.tool != EditorTool::Line {
        return;
    }

    // Keys belong to the text field being edited
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }

    if keyboard.just_pressed(KeyCode::Enter) {
        match doc.create_line() {
            Ok(line) => {
                builder.active = Some(line);
                dirty.mark();
                info!("Building {} ({})", line, crate::network::line_name(line.0));
            }
            Err(err) => warn!("Cannot start a line: {}", err),
        }
    } else if keyboard.just_pressed(KeyCode::Escape)
        && let Some(line) = builder.active.take()
    {
        let stops = doc.line(line).map(|l| l.stops.len()).unwrap_or(0);
        info!("Finished {} with {} stops", line, stops);
    }
}
