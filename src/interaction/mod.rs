//! Gesture state machine behind the document canvas.
//!
//! The canvas turns raw pointer events into hit-test results and feeds them
//! to [`InteractionState`]; the state decides what is selected, which type
//! prompt to open and which [`EditRequest`](crate::history::EditRequest) to
//! emit. It never touches the document itself.

mod state;
mod systems;

#[cfg(test)]
mod tests;

pub use state::{Gesture, InteractionState, TypePrompt};

use bevy::prelude::*;

use crate::conditions::{document_loaded, no_dialog_open};

pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<InteractionState>().add_systems(
            Update,
            (
                systems::reset_on_switch,
                systems::handle_interaction_keys
                    .run_if(document_loaded)
                    .run_if(no_dialog_open),
            )
                .chain(),
        );
    }
}
