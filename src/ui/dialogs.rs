//! Modal windows: merge confirmation, notices, errors and progress.

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};

use crate::config::{AppConfig, ConfigResetNotification, MissingMapWarning, SaveConfigRequest};
use crate::editor::merge::MergeState;
use crate::editor::{EditorNotice, EditorSession};
use crate::network::{line_name, AsyncMapOperation, MapLoadError, MapSaveError, NetworkDocument};
use crate::simulator::SimulatorError;
use crate::theme::ui::{ERROR_TEXT, HINT_TEXT};

/// Asks whether the captured station should be merged into another one
pub fn merge_prompt_ui(
    mut contexts: EguiContexts,
    mut session: ResMut<EditorSession>,
    doc: Res<NetworkDocument>,
) -> Result {
    let MergeState::AwaitingConfirmation { source, line } = session.merge.state() else {
        return Ok(());
    };
    let station_name = doc
        .station(source)
        .map(|s| s.name.clone())
        .unwrap_or_else(|| source.to_string());

    egui::Window::new("Merge Station")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label(format!(
                "Merge {} (line {}) into another station?",
                station_name,
                line_name(line.0)
            ));
            ui.label(
                egui::RichText::new("Double-click the station it should replace next.")
                    .color(HINT_TEXT),
            );
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Yes").clicked() {
                    session.merge.confirm();
                }
                if ui.button("No").clicked() {
                    session.merge.decline();
                }
            });
        });

    Ok(())
}

/// Shows a refused edit or validation failure until dismissed
pub fn notice_ui(mut contexts: EguiContexts, mut notice: ResMut<EditorNotice>) -> Result {
    let Some(message) = notice.message.clone() else {
        return Ok(());
    };

    egui::Window::new("Notice")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label(message);
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                notice.message = None;
            }
        });

    Ok(())
}

/// Renders the missing map warning dialog (shown at startup if last map doesn't exist)
pub fn missing_map_warning_ui(
    mut contexts: EguiContexts,
    mut warning: ResMut<MissingMapWarning>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
) -> Result {
    if !warning.show {
        return Ok(());
    }

    egui::Window::new("Map Not Found")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label("The last opened map file no longer exists:");

            if let Some(ref path) = warning.path {
                ui.add_space(5.0);
                ui.label(egui::RichText::new(path.to_string_lossy()).weak());
                ui.add_space(10.0);
            }

            ui.horizontal(|ui| {
                if ui.button("OK").clicked() {
                    warning.show = false;
                }

                if ui.button("Clear from history").clicked() {
                    if let Some(path) = warning.path.take() {
                        config.data.recent_maps.retain(|p| p != &path);
                    }
                    config.data.last_map_path = None;
                    config.dirty = true;
                    save_events.write(SaveConfigRequest);
                    warning.show = false;
                }
            });
        });

    Ok(())
}

/// Blocks the editor while a map is being read or written
pub fn async_operation_modal_ui(
    mut contexts: EguiContexts,
    async_op: Res<AsyncMapOperation>,
) -> Result {
    if !async_op.is_busy() {
        return Ok(());
    }

    egui::Window::new("Please Wait")
        .collapsible(false)
        .resizable(false)
        .title_bar(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(
                    async_op
                        .operation_description
                        .as_deref()
                        .unwrap_or("Working..."),
                );
            });
        });

    Ok(())
}

fn error_window(ctx: &egui::Context, title: &str, message: &str) -> bool {
    let mut dismissed = false;
    egui::Window::new(title)
        .collapsible(false)
        .resizable(true)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().max_height(200.0).show(ui, |ui| {
                ui.colored_label(ERROR_TEXT, message);
            });
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });
    dismissed
}

/// Save, load and simulator launch failures
pub fn io_error_dialog_ui(
    mut contexts: EguiContexts,
    mut save_error: ResMut<MapSaveError>,
    mut load_error: ResMut<MapLoadError>,
    mut sim_error: ResMut<SimulatorError>,
) -> Result {
    let ctx = contexts.ctx_mut()?;

    if let Some(message) = save_error.message.clone()
        && error_window(ctx, "Save Error", &message)
    {
        save_error.message = None;
    }
    if let Some(message) = load_error.message.clone()
        && error_window(ctx, "Load Error", &message)
    {
        load_error.message = None;
    }
    if let Some(message) = sim_error.message.clone()
        && error_window(ctx, "Simulator Error", &message)
    {
        sim_error.message = None;
    }

    Ok(())
}

/// Tells the user their configuration file was unreadable and was reset
pub fn config_reset_notification_ui(
    mut contexts: EguiContexts,
    mut notification: ResMut<ConfigResetNotification>,
) -> Result {
    if !notification.show {
        return Ok(());
    }

    egui::Window::new("Settings Reset")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label("Your settings could not be loaded and were reset to defaults.");
            if let Some(ref reason) = notification.reason {
                ui.add_space(5.0);
                ui.label(egui::RichText::new(reason).color(HINT_TEXT));
            }
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                notification.show = false;
                notification.reason = None;
            }
        });

    Ok(())
}
