use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use bevy_egui::{egui, EguiContexts};

use crate::config::AppConfig;
use crate::editor::gesture::GestureState;
use crate::editor::merge::MergeState;
use crate::editor::{CurrentTool, EditorSession, EditorTool, LineBuilder};
use crate::events::PendingSelection;
use crate::network::{
    line_name, CurrentMapFile, LoadMapRequest, MapDirtyState, NetworkDocument, NewMapRequest,
    SaveMapRequest,
};
use crate::simulator::RunSimulationRequest;
use crate::theme::ui::{HINT_TEXT, WARNING_TEXT};

use super::file_menu::FileMenuState;
use super::settings_dialog::SettingsDialogState;

/// Short status describing what the next double-click will do
fn interaction_hint(session: &EditorSession) -> Option<String> {
    match session.pending {
        PendingSelection::Start => return Some("Double-click the start station".to_string()),
        PendingSelection::End => return Some("Double-click the end station".to_string()),
        PendingSelection::Concerned => {
            return Some("Double-click a concerned station".to_string());
        }
        PendingSelection::None => {}
    }
    if let MergeState::AwaitingTarget { .. } = session.merge.state() {
        return Some("Double-click the station to replace".to_string());
    }
    match session.gesture.state() {
        GestureState::Extending(area, side) => {
            Some(format!("Resizing {} ({} edge)", area, side.label()))
        }
        _ => None,
    }
}

/// Main toolbar: file menu, tools and map status
#[allow(clippy::too_many_arguments)]
pub fn toolbar_ui(
    mut contexts: EguiContexts,
    mut current_tool: ResMut<CurrentTool>,
    mut builder: ResMut<LineBuilder>,
    mut menu_state: ResMut<FileMenuState>,
    mut settings: ResMut<SettingsDialogState>,
    config: Res<AppConfig>,
    session: Res<EditorSession>,
    doc: Res<NetworkDocument>,
    current: Res<CurrentMapFile>,
    dirty: Res<MapDirtyState>,
    mut writers: (
        MessageWriter<SaveMapRequest>,
        MessageWriter<LoadMapRequest>,
        MessageWriter<NewMapRequest>,
        MessageWriter<RunSimulationRequest>,
    ),
) -> Result {
    let (save_events, load_events, new_events, sim_events) = &mut writers;

    egui::TopBottomPanel::top("main_toolbar")
        .frame(
            egui::Frame::side_top_panel(&contexts.ctx_mut()?.style())
                .inner_margin(egui::Margin::symmetric(12, 8)),
        )
        .show(contexts.ctx_mut()?, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = 4.0;

                ui.menu_button("File", |ui| {
                    if ui.button("New Map (Ctrl+N)").clicked() {
                        menu_state.new_map(&dirty, new_events);
                        ui.close();
                    }
                    if ui.button("Open... (Ctrl+O)").clicked() {
                        menu_state.open();
                        ui.close();
                    }
                    ui.menu_button("Open Recent", |ui| {
                        if config.data.recent_maps.is_empty() {
                            ui.label(egui::RichText::new("No recent maps").color(HINT_TEXT));
                        }
                        for path in &config.data.recent_maps {
                            let label = path
                                .file_name()
                                .map(|n| n.to_string_lossy().to_string())
                                .unwrap_or_else(|| path.to_string_lossy().to_string());
                            if ui
                                .button(label)
                                .on_hover_text(path.to_string_lossy().to_string())
                                .clicked()
                            {
                                load_events.write(LoadMapRequest { path: path.clone() });
                                ui.close();
                            }
                        }
                    });

                    ui.separator();

                    if ui.button("Save (Ctrl+S)").clicked() {
                        menu_state.save(&current, save_events);
                        ui.close();
                    }
                    if ui.button("Save As... (Ctrl+Shift+S)").clicked() {
                        menu_state.save_as(&current);
                        ui.close();
                    }

                    ui.separator();

                    if ui.button("Run Simulation (F5)").clicked() {
                        sim_events.write(RunSimulationRequest);
                        ui.close();
                    }
                    if ui.button("Settings...").clicked() {
                        settings.open(&config);
                        ui.close();
                    }
                });

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                // Tool buttons with keyboard shortcuts
                for tool in EditorTool::all() {
                    let selected = current_tool.tool == *tool;
                    let button = egui::Button::new(
                        egui::RichText::new(tool.display_name()).size(14.0).strong(),
                    )
                    .min_size(egui::vec2(0.0, 28.0))
                    .selected(selected);

                    if ui.add(button).clicked() {
                        if *tool != EditorTool::Line {
                            builder.active = None;
                        }
                        current_tool.tool = *tool;
                    }
                }

                if current_tool.tool == EditorTool::Line {
                    ui.add_space(8.0);
                    let text = match builder.active {
                        Some(line) => format!("Building line {} (Esc to finish)", line_name(line.0)),
                        None => "Enter starts a new line".to_string(),
                    };
                    ui.label(egui::RichText::new(text).color(HINT_TEXT));
                }

                if let Some(hint) = interaction_hint(&session) {
                    ui.add_space(8.0);
                    ui.label(egui::RichText::new(hint).color(WARNING_TEXT));
                }

                // Right-aligned map status
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        egui::RichText::new(format!("zoom {}", doc.viewport.zoom)).color(HINT_TEXT),
                    );
                    ui.separator();
                    let marker = if dirty.is_dirty { "*" } else { "" };
                    ui.label(format!("{}{}", current.display_name(), marker));
                });
            });
        });
    Ok(())
}

/// Keeps the window title in sync with the open map
pub fn update_window_title(
    current: Res<CurrentMapFile>,
    dirty: Res<MapDirtyState>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    if !current.is_changed() && !dirty.is_changed() {
        return;
    }
    let Ok(mut window) = windows.single_mut() else {
        return;
    };
    let marker = if dirty.is_dirty { " *" } else { "" };
    window.title = format!("Railforge - {}{}", current.display_name(), marker);
}
