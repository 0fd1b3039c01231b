use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, Task};
use bevy_egui::{egui, EguiContexts};
use futures_lite::future;
use std::path::PathBuf;

use crate::config::{AppConfig, SaveConfigRequest, SetSimulatorPathRequest};
use crate::geo::{GeoPosition, MAX_ZOOM, MIN_ZOOM};
use crate::network::NetworkDocument;
use crate::theme::ui::HINT_TEXT;

/// State for the settings dialog
#[derive(Resource, Default)]
pub struct SettingsDialogState {
    /// Whether the dialog is open
    pub is_open: bool,
    /// Edited simulator path (as string for text editing)
    pub simulator_path: String,
    pub default_center: GeoPosition,
    pub default_zoom: u8,
    /// Whether changes have been made
    pub has_changes: bool,
    /// Pending async file dialog for browsing executables
    pub pending_browse: Option<Task<Option<PathBuf>>>,
}

impl SettingsDialogState {
    /// Open the dialog initialized from current config
    pub fn open(&mut self, config: &AppConfig) {
        self.simulator_path = config
            .data
            .simulator_path
            .as_ref()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default();
        self.default_center = config.data.default_center;
        self.default_zoom = config.data.default_zoom;
        self.has_changes = false;
        self.is_open = true;
    }

    fn simulator_path(&self) -> Option<PathBuf> {
        let trimmed = self.simulator_path.trim();
        (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
    }
}

/// Renders the settings dialog
pub fn settings_dialog_ui(
    mut contexts: EguiContexts,
    mut dialog_state: ResMut<SettingsDialogState>,
    mut config: ResMut<AppConfig>,
    doc: Res<NetworkDocument>,
    mut simulator_events: MessageWriter<SetSimulatorPathRequest>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) -> Result {
    // Poll pending browse task (before early return so cleanup happens even if closed)
    if let Some(ref mut task) = dialog_state.pending_browse
        && let Some(result) = future::block_on(future::poll_once(task))
    {
        dialog_state.pending_browse = None;
        if let Some(path) = result {
            dialog_state.simulator_path = path.to_string_lossy().to_string();
            dialog_state.has_changes = true;
        }
    }

    if !dialog_state.is_open {
        return Ok(());
    }

    let mut should_close = false;
    let mut should_save = false;
    let mut should_browse = false;

    egui::Window::new("Settings")
        .collapsible(false)
        .resizable(true)
        .min_width(400.0)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.group(|ui| {
                ui.label(egui::RichText::new("Simulator").strong());
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut dialog_state.simulator_path)
                            .desired_width(280.0)
                            .hint_text("No simulator set"),
                    );
                    if response.changed() {
                        dialog_state.has_changes = true;
                    }

                    if ui.button("Browse...").clicked() {
                        should_browse = true;
                    }
                });
                ui.label(
                    egui::RichText::new("Started with the exported map as its only argument (F5)")
                        .color(HINT_TEXT),
                );
            });

            ui.add_space(12.0);

            ui.group(|ui| {
                ui.label(egui::RichText::new("Default View").strong());
                ui.add_space(8.0);

                let state = &mut *dialog_state;
                let mut changed = false;
                ui.horizontal(|ui| {
                    ui.label("Latitude:");
                    changed |= ui
                        .add(
                            egui::DragValue::new(&mut state.default_center.latitude)
                                .speed(0.001)
                                .range(-85.0..=85.0),
                        )
                        .changed();
                    ui.label("Longitude:");
                    changed |= ui
                        .add(
                            egui::DragValue::new(&mut state.default_center.longitude)
                                .speed(0.001)
                                .range(-180.0..=180.0),
                        )
                        .changed();
                });
                ui.horizontal(|ui| {
                    ui.label("Zoom:");
                    changed |= ui
                        .add(egui::Slider::new(&mut state.default_zoom, MIN_ZOOM..=MAX_ZOOM))
                        .changed();
                });
                if ui.button("Use current view").clicked() {
                    state.default_center = doc.viewport.center;
                    state.default_zoom = doc.viewport.zoom;
                    changed = true;
                }
                state.has_changes |= changed;
            });

            ui.add_space(12.0);

            ui.horizontal(|ui| {
                if ui
                    .add_enabled(dialog_state.has_changes, egui::Button::new("Save"))
                    .clicked()
                {
                    should_save = true;
                }

                if ui.button("Cancel").clicked() {
                    should_close = true;
                }
            });
        });

    // Handle browse button - spawn async dialog
    if should_browse && dialog_state.pending_browse.is_none() {
        let task_pool = AsyncComputeTaskPool::get();
        dialog_state.pending_browse = Some(task_pool.spawn(async {
            rfd::AsyncFileDialog::new()
                .set_title("Select Simulator")
                .pick_file()
                .await
                .map(|h| h.path().to_path_buf())
        }));
    }

    if should_save {
        match dialog_state.simulator_path() {
            Some(path) => {
                simulator_events.write(SetSimulatorPathRequest { path });
            }
            None => config.data.simulator_path = None,
        }
        config.data.default_center = dialog_state.default_center;
        config.data.default_zoom = dialog_state.default_zoom;
        config.dirty = true;
        save_events.write(SaveConfigRequest);
        should_close = true;
    }

    if should_close {
        dialog_state.is_open = false;
        dialog_state.has_changes = false;
    }

    Ok(())
}
