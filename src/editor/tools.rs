use bevy::prelude::*;
use bevy::window::{CursorIcon, PrimaryWindow, SystemCursorIcon};
use bevy_egui::EguiContexts;

use crate::events::PendingSelection;
use crate::network::LineId;

use super::hit_test::{self, Hit};
use super::params::CursorPixel;
use super::session::EditorSession;
use crate::network::NetworkDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorTool {
    #[default]
    Select,
    Station,
    Line,
    Area,
}

impl EditorTool {
    pub fn display_name(&self) -> &'static str {
        match self {
            EditorTool::Select => "Select (V)",
            EditorTool::Station => "Station (S)",
            EditorTool::Line => "Line (L)",
            EditorTool::Area => "Area (A)",
        }
    }

    pub fn cursor_icon(&self) -> CursorIcon {
        match self {
            EditorTool::Select => CursorIcon::System(SystemCursorIcon::Default),
            EditorTool::Station => CursorIcon::System(SystemCursorIcon::Crosshair),
            EditorTool::Line => CursorIcon::System(SystemCursorIcon::Pointer),
            EditorTool::Area => CursorIcon::System(SystemCursorIcon::Cell),
        }
    }

    pub fn all() -> &'static [EditorTool] {
        &[
            EditorTool::Select,
            EditorTool::Station,
            EditorTool::Line,
            EditorTool::Area,
        ]
    }
}

#[derive(Resource, Default)]
pub struct CurrentTool {
    pub tool: EditorTool,
}

/// Line being extended by the line tool, if any.
#[derive(Resource, Default)]
pub struct LineBuilder {
    pub active: Option<LineId>,
}

pub fn handle_tool_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut current_tool: ResMut<CurrentTool>,
    mut builder: ResMut<LineBuilder>,
    mut session: ResMut<EditorSession>,
    mut contexts: EguiContexts,
) {
    // Don't change tools if typing in a text field
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }

    let new_tool = if keyboard.just_pressed(KeyCode::KeyV) {
        Some(EditorTool::Select)
    } else if keyboard.just_pressed(KeyCode::KeyS) && !ctrl_held(&keyboard) {
        Some(EditorTool::Station)
    } else if keyboard.just_pressed(KeyCode::KeyL) {
        Some(EditorTool::Line)
    } else if keyboard.just_pressed(KeyCode::KeyA) {
        Some(EditorTool::Area)
    } else {
        None
    };

    if let Some(tool) = new_tool {
        // Leaving the line tool finishes the line in progress
        if tool != EditorTool::Line {
            builder.active = None;
        }
        current_tool.tool = tool;
    }

    // Number keys arm the next station double-click for the event draft
    let pending = if keyboard.just_pressed(KeyCode::Digit1) {
        Some(PendingSelection::Start)
    } else if keyboard.just_pressed(KeyCode::Digit2) {
        Some(PendingSelection::End)
    } else if keyboard.just_pressed(KeyCode::Digit3) {
        Some(PendingSelection::Concerned)
    } else {
        None
    };
    if let Some(pending) = pending {
        session.pending = pending;
        debug!("Pending station selection: {:?}", pending);
    }
}

pub(crate) fn ctrl_held(keyboard: &ButtonInput<KeyCode>) -> bool {
    keyboard.pressed(KeyCode::ControlLeft)
        || keyboard.pressed(KeyCode::ControlRight)
        || keyboard.pressed(KeyCode::SuperLeft)
        || keyboard.pressed(KeyCode::SuperRight)
}

pub fn update_cursor_icon(
    current_tool: Res<CurrentTool>,
    session: Res<EditorSession>,
    doc: Res<NetworkDocument>,
    cursor: CursorPixel,
    mut window_query: Query<Entity, With<PrimaryWindow>>,
    mut commands: Commands,
    mut contexts: EguiContexts,
) {
    let Ok(entity) = window_query.single_mut() else {
        return;
    };

    // Use default cursor over UI, tool cursor in editor space
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.is_pointer_over_area()
    {
        commands
            .entity(entity)
            .insert(CursorIcon::System(SystemCursorIcon::Default));
        return;
    }

    if let Some(icon) = session.gesture.state().cursor_icon() {
        commands.entity(entity).insert(icon);
        return;
    }

    // Hovering an area edge with the select tool hints at resizing
    if current_tool.tool == EditorTool::Select
        && let Some(point) = cursor.pixel()
        && let Some(Hit::Border(_, side)) = hit_test::hit_at(&doc, point)
    {
        commands.entity(entity).insert(side.cursor_icon());
        return;
    }

    commands.entity(entity).insert(current_tool.tool.cursor_icon());
}
