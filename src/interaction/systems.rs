//! Keyboard systems for the canvas gestures.

use bevy::prelude::*;
use bevy_egui::EguiContexts;

use crate::common::StatusMessage;
use crate::history::EditRequest;
use crate::navigator::DocumentSwitched;

use super::state::InteractionState;

/// D deletes the selection, Escape drops gestures and selection
pub fn handle_interaction_keys(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut contexts: EguiContexts,
    mut interaction: ResMut<InteractionState>,
    mut status: ResMut<StatusMessage>,
    mut edit_events: MessageWriter<EditRequest>,
) {
    // Don't steal keys from text fields
    if let Ok(ctx) = contexts.ctx_mut()
        && ctx.wants_keyboard_input()
    {
        return;
    }

    if keyboard.just_pressed(KeyCode::Escape) {
        if *interaction != InteractionState::default() {
            interaction.reset();
            status.info("Selection cleared");
        }
        return;
    }

    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    if !ctrl
        && keyboard.just_pressed(KeyCode::KeyD)
        && let Some(request) = interaction.delete_selection()
    {
        edit_events.write(request);
    }
}

/// A new document invalidates every span the state refers to
pub fn reset_on_switch(
    mut events: MessageReader<DocumentSwitched>,
    mut interaction: ResMut<InteractionState>,
) {
    if events.read().count() > 0 {
        interaction.reset();
    }
}
