//! Bevy systems that apply edits and handle undo/redo.

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::common::StatusMessage;
use crate::config::AppConfig;
use crate::navigator::{DocumentNavigator, DocumentSwitched};

use super::command_history::CommandHistory;
use super::execute::apply_edit;
use super::messages::{EditRequest, RedoRequest, UndoRequest};

/// System to handle undo/redo keyboard shortcuts (Ctrl+Z, Ctrl+Y, Ctrl+Shift+Z)
pub fn handle_undo_redo_shortcuts(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut contexts: EguiContexts,
    mut undo_events: MessageWriter<UndoRequest>,
    mut redo_events: MessageWriter<RedoRequest>,
) {
    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    if !ctrl {
        return;
    }

    // Text fields have their own undo
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }

    let shift = keyboard.pressed(KeyCode::ShiftLeft) || keyboard.pressed(KeyCode::ShiftRight);

    if keyboard.just_pressed(KeyCode::KeyY) || (shift && keyboard.just_pressed(KeyCode::KeyZ)) {
        redo_events.write(RedoRequest);
    } else if keyboard.just_pressed(KeyCode::KeyZ) {
        undo_events.write(UndoRequest);
    }
}

/// Applies edit requests to the working document and journals them
pub fn apply_edit_requests(
    mut events: MessageReader<EditRequest>,
    mut navigator: ResMut<DocumentNavigator>,
    mut history: ResMut<CommandHistory>,
    mut status: ResMut<StatusMessage>,
) {
    for request in events.read() {
        match navigator.edit(|document| apply_edit(request, document)) {
            Some(command) => {
                let description = command.description();
                debug!("Applied {}", description);
                status.info(format!("Did: {}", description));
                history.push(command);
            }
            None => debug!("Edit changed nothing: {:?}", request),
        }
    }
}

pub fn undo_system(
    mut events: MessageReader<UndoRequest>,
    mut navigator: ResMut<DocumentNavigator>,
    mut history: ResMut<CommandHistory>,
    mut status: ResMut<StatusMessage>,
) {
    for _ in events.read() {
        let Some((description, outcome)) = navigator.edit(|document| history.undo(document))
        else {
            status.info("Nothing to undo");
            continue;
        };

        match outcome.unresolved {
            Some(report) => status.warning(format!(
                "Undid: {} ({} annotation(s) could not be restored)",
                description,
                report.skipped_entities.len() + report.skipped_relations.len()
            )),
            None => status.info(format!("Undid: {}", description)),
        }
    }
}

pub fn redo_system(
    mut events: MessageReader<RedoRequest>,
    mut navigator: ResMut<DocumentNavigator>,
    mut history: ResMut<CommandHistory>,
    mut status: ResMut<StatusMessage>,
) {
    for _ in events.read() {
        if !history.can_redo() {
            status.info("Nothing to redo");
            continue;
        }
        match navigator.edit(|document| history.redo(document)) {
            Some(description) => status.info(format!("Redid: {}", description)),
            None => status.warning("Redo no longer applies to this document"),
        }
    }
}

/// The journal belongs to one document
pub fn clear_history_on_switch(
    mut events: MessageReader<DocumentSwitched>,
    mut history: ResMut<CommandHistory>,
) {
    if events.read().count() > 0 {
        history.clear();
    }
}

/// Keeps the journal depth in step with the settings
pub fn sync_history_depth(config: Res<AppConfig>, mut history: ResMut<CommandHistory>) {
    let depth = config.data.effective_undo_depth();
    if history.max_depth() != depth {
        history.set_max_depth(depth);
    }
}
