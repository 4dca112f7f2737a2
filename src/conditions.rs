//! Run conditions shared by the input handling systems.

use bevy::prelude::*;

use crate::navigator::DocumentNavigator;
use crate::ui::DialogState;

/// Run condition: returns true when no modal dialog is open.
///
/// Keeps document and navigation input handlers idle while the user is
/// interacting with a dialog.
///
/// Usage: `.run_if(no_dialog_open)`
pub fn no_dialog_open(dialog_state: Res<DialogState>) -> bool {
    !dialog_state.any_modal_open
}

/// Run condition: returns true when a document is loaded for editing
pub fn document_loaded(navigator: Res<DocumentNavigator>) -> bool {
    navigator.document().is_some()
}
