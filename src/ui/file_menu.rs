use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, Task};
use bevy::window::WindowCloseRequested;
use bevy_egui::{egui, EguiContexts};
use futures_lite::future;
use std::path::PathBuf;

use crate::common::StatusMessage;
use crate::config::{AppConfig, ConfigResetNotification, SaveConfigRequest};
use crate::navigator::{
    AfterSave, AsyncCollectionOperation, CollectionLoadError, CollectionSaveError,
    DocumentNavigator, OpenCollectionRequest, SaveCollectionRequest, UnsavedChangesDialog,
};
use crate::theme;

#[derive(Resource, Default)]
pub struct FileMenuState {
    /// Pending native "open collection" dialog
    pub pending_browse: Option<Task<Option<PathBuf>>>,
}

/// Show the native open dialog unless one is already up
pub fn spawn_browse(state: &mut FileMenuState) {
    if state.pending_browse.is_some() {
        return;
    }
    let task_pool = AsyncComputeTaskPool::get();
    state.pending_browse = Some(task_pool.spawn(async {
        rfd::AsyncFileDialog::new()
            .set_title("Open Collection")
            .add_filter("JSON Lines", &["jsonl", "json"])
            .add_filter("All files", &["*"])
            .pick_file()
            .await
            .map(|h| h.path().to_path_buf())
    }));
}

/// Open `path`, asking first when the current collection has unsaved edits
pub fn request_open(
    path: PathBuf,
    navigator: &DocumentNavigator,
    dialog: &mut UnsavedChangesDialog,
    open_events: &mut MessageWriter<OpenCollectionRequest>,
) {
    if navigator.has_unsaved_changes() {
        dialog.pending_open = Some(path);
    } else {
        open_events.write(OpenCollectionRequest { path });
    }
}

pub fn poll_browse_task(
    mut state: ResMut<FileMenuState>,
    navigator: Res<DocumentNavigator>,
    mut dialog: ResMut<UnsavedChangesDialog>,
    mut open_events: MessageWriter<OpenCollectionRequest>,
) {
    if let Some(ref mut task) = state.pending_browse
        && let Some(result) = future::block_on(future::poll_once(task))
    {
        state.pending_browse = None;
        if let Some(path) = result {
            request_open(path, &navigator, &mut dialog, &mut open_events);
        }
    }
}

/// Ctrl+O opens, Ctrl+S saves
pub fn handle_file_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut state: ResMut<FileMenuState>,
    navigator: Res<DocumentNavigator>,
    mut save_events: MessageWriter<SaveCollectionRequest>,
) {
    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    if !ctrl {
        return;
    }
    if keyboard.just_pressed(KeyCode::KeyO) {
        spawn_browse(&mut state);
    }
    if keyboard.just_pressed(KeyCode::KeyS) && navigator.is_open() {
        save_events.write(SaveCollectionRequest);
    }
}

/// Intercept window close so unsaved edits can be saved first
pub fn handle_window_close(
    mut close_events: MessageReader<WindowCloseRequested>,
    navigator: Res<DocumentNavigator>,
    mut dialog: ResMut<UnsavedChangesDialog>,
    mut exit_events: MessageWriter<AppExit>,
) {
    if close_events.read().count() == 0 {
        return;
    }
    if navigator.has_unsaved_changes() {
        dialog.show_close_confirmation = true;
    } else {
        exit_events.write(AppExit::Success);
    }
}

/// Open the collection named on the command line
pub fn open_cli_argument(
    mut open_events: MessageWriter<OpenCollectionRequest>,
    mut status: ResMut<StatusMessage>,
) {
    let Some(arg) = std::env::args_os().nth(1) else {
        return;
    };
    let path = PathBuf::from(arg);
    if path.exists() {
        info!("Opening {} from the command line", path.display());
        open_events.write(OpenCollectionRequest { path });
    } else {
        warn!("Command line path does not exist: {}", path.display());
        status.warning(format!("File not found: {}", path.display()));
    }
}

/// Save / discard / cancel prompt before dropping unsaved edits
pub fn unsaved_changes_dialog_ui(
    mut contexts: EguiContexts,
    mut dialog: ResMut<UnsavedChangesDialog>,
    mut after_save: ResMut<AfterSave>,
    mut save_events: MessageWriter<SaveCollectionRequest>,
    mut open_events: MessageWriter<OpenCollectionRequest>,
    mut exit_events: MessageWriter<AppExit>,
) -> Result {
    if !dialog.is_open() {
        return Ok(());
    }

    let closing = dialog.show_close_confirmation;
    let mut save = false;
    let mut discard = false;
    let mut cancel = false;

    egui::Window::new("Unsaved Changes")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label("The current collection has unsaved changes.");
            if let Some(ref path) = dialog.pending_open {
                ui.label(
                    egui::RichText::new(format!("Opening {}", path.display()))
                        .weak()
                        .small(),
                );
            }
            ui.add_space(10.0);
            ui.horizontal(|ui| {
                let save_text = if closing { "Save and Exit" } else { "Save and Open" };
                if ui.button(save_text).clicked() {
                    save = true;
                }
                let discard_text = if closing { "Exit Without Saving" } else { "Discard" };
                if ui.button(discard_text).clicked() {
                    discard = true;
                }
                if ui.button("Cancel").clicked() {
                    cancel = true;
                }
            });
        });

    if save {
        *after_save = AfterSave {
            open: dialog.pending_open.take(),
            exit: closing,
        };
        save_events.write(SaveCollectionRequest);
        dialog.show_close_confirmation = false;
    } else if discard {
        if closing {
            exit_events.write(AppExit::Success);
        } else if let Some(path) = dialog.pending_open.take() {
            open_events.write(OpenCollectionRequest { path });
        }
        dialog.show_close_confirmation = false;
    } else if cancel {
        dialog.pending_open = None;
        dialog.show_close_confirmation = false;
    }

    Ok(())
}

/// Blocking notice while a collection loads in the background
pub fn async_operation_modal_ui(
    mut contexts: EguiContexts,
    async_op: Res<AsyncCollectionOperation>,
) -> Result {
    if !async_op.is_busy() {
        return Ok(());
    }
    let ctx = contexts.ctx_mut()?;

    egui::Modal::new(egui::Id::new("async_operation"))
        .backdrop_color(theme::ui::MODAL_OVERLAY)
        .show(ctx, |ui| {
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

pub fn load_error_dialog_ui(
    mut contexts: EguiContexts,
    mut load_error: ResMut<CollectionLoadError>,
) -> Result {
    let Some(message) = load_error.message.clone() else {
        return Ok(());
    };

    egui::Window::new("Open Failed")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label(egui::RichText::new(message).color(theme::ui::ERROR_TEXT));
            ui.add_space(10.0);
            if ui.button("OK").clicked() {
                load_error.message = None;
            }
        });

    Ok(())
}

pub fn save_error_dialog_ui(
    mut contexts: EguiContexts,
    mut save_error: ResMut<CollectionSaveError>,
    mut save_events: MessageWriter<SaveCollectionRequest>,
) -> Result {
    let Some(message) = save_error.message.clone() else {
        return Ok(());
    };

    egui::Window::new("Save Failed")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(contexts.ctx_mut()?, |ui| {
            ui.label("Your edits are still in memory.");
            ui.label(egui::RichText::new(message).color(theme::ui::ERROR_TEXT));
            ui.add_space(10.0);
            ui.horizontal(|ui| {
                if ui.button("Retry").clicked() {
                    save_error.message = None;
                    save_events.write(SaveCollectionRequest);
                }
                if ui.button("OK").clicked() {
                    save_error.message = None;
                }
            });
        });

    Ok(())
}

/// Shown once when the settings file could not be read
pub fn config_reset_notification_ui(
    mut contexts: EguiContexts,
    mut notification: ResMut<ConfigResetNotification>,
    mut config: ResMut<AppConfig>,
    mut save_events: MessageWriter<SaveConfigRequest>,
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
                ui.label(egui::RichText::new(reason).weak());
            }
            ui.add_space(10.0);
            if ui.button("OK").clicked() {
                notification.show = false;
                notification.reason = None;
                // Overwrite the unreadable file with the defaults
                config.dirty = true;
                save_events.write(SaveConfigRequest);
            }
        });

    Ok(())
}
