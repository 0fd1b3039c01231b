//! File operations: new/open/save, their shortcuts and the native file dialogs.

use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, Task};
use bevy_egui::{egui, EguiContexts};
use futures_lite::future;
use std::path::{Path, PathBuf};

use crate::editor::tools::ctrl_held;
use crate::network::{
    CurrentMapFile, LoadMapRequest, MapDirtyState, NewMapRequest, SaveMapRequest,
};
use crate::paths;
use crate::simulator::RunSimulationRequest;

use super::DialogState;

const MAP_EXTENSION: &str = "xml";

#[derive(Resource, Default)]
pub struct FileMenuState {
    pub show_new_confirmation: bool,
    /// Pending native "open" dialog
    pub pending_open: Option<Task<Option<PathBuf>>>,
    /// Pending native "save as" dialog
    pub pending_save: Option<Task<Option<PathBuf>>>,
}

impl FileMenuState {
    pub fn any_file_dialog_pending(&self) -> bool {
        self.pending_open.is_some() || self.pending_save.is_some()
    }

    /// Ask for a map to open.
    pub fn open(&mut self) {
        if self.any_file_dialog_pending() {
            return;
        }
        let maps_dir = paths::maps_dir();
        let task_pool = AsyncComputeTaskPool::get();
        self.pending_open = Some(task_pool.spawn(async move {
            rfd::AsyncFileDialog::new()
                .add_filter("Map Files", &[MAP_EXTENSION])
                .set_directory(&maps_dir)
                .set_title("Open Map")
                .pick_file()
                .await
                .map(|h| h.path().to_path_buf())
        }));
    }

    /// Ask where to save, suggesting the current file name.
    pub fn save_as(&mut self, current: &CurrentMapFile) {
        if self.any_file_dialog_pending() {
            return;
        }
        let directory = current
            .path
            .as_ref()
            .and_then(|p| p.parent())
            .map(Path::to_path_buf)
            .unwrap_or_else(paths::maps_dir);
        let file_name = format!(
            "{}.{}",
            sanitize_filename(&current.display_name()),
            MAP_EXTENSION
        );
        let task_pool = AsyncComputeTaskPool::get();
        self.pending_save = Some(task_pool.spawn(async move {
            rfd::AsyncFileDialog::new()
                .add_filter("Map Files", &[MAP_EXTENSION])
                .set_directory(&directory)
                .set_file_name(file_name)
                .set_title("Save Map")
                .save_file()
                .await
                .map(|h| h.path().to_path_buf())
        }));
    }

    /// Save to the current file, or ask for one if the map was never saved.
    pub fn save(
        &mut self,
        current: &CurrentMapFile,
        save_events: &mut MessageWriter<SaveMapRequest>,
    ) {
        match &current.path {
            Some(path) => {
                save_events.write(SaveMapRequest { path: path.clone() });
            }
            None => self.save_as(current),
        }
    }

    /// Start a new map, asking first if there are unsaved changes.
    pub fn new_map(&mut self, dirty: &MapDirtyState, new_events: &mut MessageWriter<NewMapRequest>) {
        if dirty.is_dirty {
            self.show_new_confirmation = true;
        } else {
            new_events.write(NewMapRequest);
        }
    }
}

/// Append the map extension when the user typed a bare name.
fn with_map_extension(path: PathBuf) -> PathBuf {
    if path.extension().is_some() {
        path
    } else {
        path.with_extension(MAP_EXTENSION)
    }
}

fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Ctrl+N / Ctrl+O / Ctrl+S / Ctrl+Shift+S and F5
#[allow(clippy::too_many_arguments)]
pub fn handle_file_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    dialog_state: Res<DialogState>,
    mut menu_state: ResMut<FileMenuState>,
    current: Res<CurrentMapFile>,
    dirty: Res<MapDirtyState>,
    mut save_events: MessageWriter<SaveMapRequest>,
    mut new_events: MessageWriter<NewMapRequest>,
    mut sim_events: MessageWriter<RunSimulationRequest>,
    mut contexts: EguiContexts,
) {
    if dialog_state.any_modal_open {
        return;
    }
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }

    if keyboard.just_pressed(KeyCode::F5) {
        sim_events.write(RunSimulationRequest);
    }

    if !ctrl_held(&keyboard) {
        return;
    }
    let shift = keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);

    if keyboard.just_pressed(KeyCode::KeyS) {
        if shift {
            menu_state.save_as(&current);
        } else {
            menu_state.save(&current, &mut save_events);
        }
    } else if keyboard.just_pressed(KeyCode::KeyO) {
        menu_state.open();
    } else if keyboard.just_pressed(KeyCode::KeyN) {
        menu_state.new_map(&dirty, &mut new_events);
    }
}

/// Polls native file dialogs and forwards the chosen paths
pub fn poll_file_dialogs(
    mut menu_state: ResMut<FileMenuState>,
    mut load_events: MessageWriter<LoadMapRequest>,
    mut save_events: MessageWriter<SaveMapRequest>,
) {
    if let Some(ref mut task) = menu_state.pending_open
        && let Some(result) = future::block_on(future::poll_once(task))
    {
        menu_state.pending_open = None;
        if let Some(path) = result {
            load_events.write(LoadMapRequest { path });
        }
    }

    if let Some(ref mut task) = menu_state.pending_save
        && let Some(result) = future::block_on(future::poll_once(task))
    {
        menu_state.pending_save = None;
        if let Some(path) = result {
            save_events.write(SaveMapRequest {
                path: with_map_extension(path),
            });
        }
    }
}

/// Renders the new map confirmation dialog
pub fn file_menu_ui(
    mut contexts: EguiContexts,
    mut menu_state: ResMut<FileMenuState>,
    mut new_events: MessageWriter<NewMapRequest>,
) -> Result {
    if menu_state.show_new_confirmation {
        egui::Window::new("New Map")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(contexts.ctx_mut()?, |ui| {
                ui.label("Create a new map? Unsaved changes will be lost.");
                ui.horizontal(|ui| {
                    if ui.button("Create New").clicked() {
                        new_events.write(NewMapRequest);
                        menu_state.show_new_confirmation = false;
                    }
                    if ui.button("Cancel").clicked() {
                        menu_state.show_new_confirmation = false;
                    }
                });
            });
    }

    Ok(())
}
