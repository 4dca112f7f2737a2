mod document_view;
mod file_menu;
mod nav_bar;
mod settings_dialog;
mod stats_window;
mod toolbar;
mod type_dialog;
mod type_prompt;

use bevy::prelude::*;
use bevy_egui::EguiPrimaryContextPass;

use crate::config::{ConfigLoaded, ConfigResetNotification};
use crate::interaction::InteractionState;
use crate::navigator::{
    AsyncCollectionOperation, CollectionLoadError, CollectionSaveError, UnsavedChangesDialog,
};
use crate::theme;

/// Resource that tracks whether any modal dialog is currently open.
/// Document input handlers should check this to avoid processing input
/// when the user is interacting with a dialog.
#[derive(Resource, Default)]
pub struct DialogState {
    /// True when any modal dialog is open that should block document input
    pub any_modal_open: bool,
}

/// System to aggregate all dialog open states into a single resource.
/// Runs in First schedule before input handlers.
#[allow(clippy::too_many_arguments)]
fn update_dialog_state(
    file_menu: Res<file_menu::FileMenuState>,
    settings: Res<settings_dialog::SettingsDialogState>,
    add_type: Res<type_dialog::AddTypeDialog>,
    interaction: Res<InteractionState>,
    config_reset: Res<ConfigResetNotification>,
    unsaved_changes: Res<UnsavedChangesDialog>,
    save_error: Res<CollectionSaveError>,
    load_error: Res<CollectionLoadError>,
    async_op: Res<AsyncCollectionOperation>,
    mut dialog_state: ResMut<DialogState>,
) {
    dialog_state.any_modal_open = interaction.pending_prompt.is_some()
        || add_type.is_open()
        || settings.is_open
        || config_reset.show
        || unsaved_changes.is_open()
        || save_error.message.is_some()
        || load_error.message.is_some()
        || async_op.is_busy()
        || file_menu.pending_browse.is_some();
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(theme::CLEAR_COLOR))
            .init_resource::<DialogState>()
            .init_resource::<document_view::CanvasState>()
            .init_resource::<file_menu::FileMenuState>()
            .init_resource::<nav_bar::NavBarState>()
            .init_resource::<settings_dialog::SettingsDialogState>()
            .init_resource::<stats_window::StatsWindowState>()
            .init_resource::<type_dialog::AddTypeDialog>()
            .init_resource::<type_prompt::TypePromptState>()
            .add_systems(Startup, spawn_camera)
            .add_systems(
                Startup,
                file_menu::open_cli_argument.after(ConfigLoaded),
            )
            // Top and bottom panels must render before the central canvas
            // Use chain() to enforce ordering
            .add_systems(
                EguiPrimaryContextPass,
                (
                    toolbar::toolbar_ui,
                    nav_bar::nav_bar_ui,
                    toolbar::status_bar_ui,
                    document_view::document_view_ui,
                )
                    .chain(),
            )
            .add_systems(
                EguiPrimaryContextPass,
                (
                    // Last: dialogs/overlays
                    type_prompt::type_prompt_ui,
                    type_dialog::add_type_dialog_ui,
                    stats_window::stats_window_ui,
                    settings_dialog::settings_dialog_ui,
                    file_menu::unsaved_changes_dialog_ui,
                    file_menu::load_error_dialog_ui,
                    file_menu::save_error_dialog_ui,
                    file_menu::config_reset_notification_ui,
                    file_menu::async_operation_modal_ui,
                )
                    .after(document_view::document_view_ui),
            )
            .add_systems(
                Update,
                (
                    document_view::reset_canvas_on_switch,
                    file_menu::poll_browse_task,
                    file_menu::handle_window_close,
                    (
                        file_menu::handle_file_shortcuts,
                        nav_bar::handle_goto_shortcut,
                    )
                        .run_if(crate::conditions::no_dialog_open),
                ),
            )
            // Update dialog state at the start of each frame
            .add_systems(First, update_dialog_state);
    }
}
