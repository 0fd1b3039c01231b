mod camera;
pub mod conditions;
pub mod gesture;
mod input;
pub mod merge;
pub mod params;
mod placement;
mod render;
pub mod session;
pub mod tools;

pub use session::EditorSession;
pub use tools::{CurrentTool, EditorTool, LineBuilder};

use bevy::prelude::*;

use conditions::{no_dialog_open, tool_is};

/// Recoverable problem to show the user (validation failures, refused edits).
#[derive(Resource, Default)]
pub struct EditorNotice {
    pub message: Option<String>,
}

impl EditorNotice {
    pub fn show(&mut self, message: String) {
        self.message = Some(message);
    }
}

pub struct EditorPlugin;

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<tools::CurrentTool>()
            .init_resource::<tools::LineBuilder>()
            .init_resource::<EditorSession>()
            .init_resource::<EditorNotice>()
            .init_resource::<input::ClickTracker>()
            .add_systems(Startup, camera::spawn_camera)
            .add_systems(PreUpdate, input::sync_viewport_size)
            .add_systems(
                Update,
                (
                    tools::handle_tool_shortcuts,
                    tools::update_cursor_icon,
                    input::handle_pointer.run_if(tool_is(EditorTool::Select)),
                    input::handle_wheel,
                    placement::handle_placement,
                    placement::handle_line_keys,
                )
                    .run_if(no_dialog_open),
            )
            .add_systems(
                PostUpdate,
                (render::draw_areas, render::draw_lines, render::draw_stations).chain(),
            );
    }
}
