mod dialogs;
mod event_panel;
pub mod file_menu;
mod settings_dialog;
mod toolbar;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::config::{ConfigResetNotification, MissingMapWarning};
use crate::editor::merge::MergeState;
use crate::editor::{EditorNotice, EditorSession};
use crate::network::{AsyncMapOperation, MapLoadError, MapSaveError};
use crate::simulator::SimulatorError;

/// Resource that tracks whether any modal dialog is currently open.
/// Editor input handlers should check this to avoid processing input
/// when the user is interacting with a dialog.
#[derive(Resource, Default)]
pub struct DialogState {
    /// True when any modal dialog is open that should block editor input
    pub any_modal_open: bool,
}

/// System to aggregate all dialog open states into a single resource.
/// Runs in First schedule before input handlers.
#[allow(clippy::too_many_arguments)]
fn update_dialog_state(
    file_menu: Res<file_menu::FileMenuState>,
    settings: Res<settings_dialog::SettingsDialogState>,
    session: Res<EditorSession>,
    notice: Res<EditorNotice>,
    missing_map: Res<MissingMapWarning>,
    config_reset: Res<ConfigResetNotification>,
    save_error: Res<MapSaveError>,
    load_error: Res<MapLoadError>,
    sim_error: Res<SimulatorError>,
    async_op: Res<AsyncMapOperation>,
    mut dialog_state: ResMut<DialogState>,
) {
    dialog_state.any_modal_open = file_menu.show_new_confirmation
        || file_menu.any_file_dialog_pending()
        || settings.is_open
        || settings.pending_browse.is_some()
        || matches!(
            session.merge.state(),
            MergeState::AwaitingConfirmation { .. }
        )
        || notice.message.is_some()
        || missing_map.show
        || config_reset.show
        || save_error.message.is_some()
        || load_error.message.is_some()
        || sim_error.message.is_some()
        || async_op.is_busy();
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DialogState>()
            .init_resource::<file_menu::FileMenuState>()
            .init_resource::<settings_dialog::SettingsDialogState>()
            // Panels render first so dialogs float above them
            .add_systems(
                EguiPrimaryContextPass,
                (toolbar::toolbar_ui, event_panel::event_panel_ui).chain(),
            )
            .add_systems(
                EguiPrimaryContextPass,
                (
                    file_menu::file_menu_ui,
                    dialogs::merge_prompt_ui,
                    dialogs::notice_ui,
                    dialogs::missing_map_warning_ui,
                    dialogs::async_operation_modal_ui,
                    dialogs::io_error_dialog_ui,
                    dialogs::config_reset_notification_ui,
                    settings_dialog::settings_dialog_ui,
                )
                    .after(event_panel::event_panel_ui),
            )
            .add_systems(
                Update,
                (file_menu::handle_file_shortcuts, file_menu::poll_file_dialogs),
            )
            .add_systems(Update, toolbar::update_window_title)
            // Update dialog state at the start of each frame
            .add_systems(First, update_dialog_state);
    }
}
