//! Undo/Redo journal for annotation edits.
//!
//! Every mutation of the working document arrives as an [`EditRequest`]
//! message, is applied in one place, and is recorded as an `EditCommand`
//! carrying what it removed or replaced so it can be reversed exactly.
//!
//! ## Usage
//!
//! - **Ctrl+Z**: Undo the last edit
//! - **Ctrl+Y** or **Ctrl+Shift+Z**: Redo the last undone edit
//!
//! The journal is bounded by the configured undo depth and is cleared when
//! another document becomes active.
//!
//! ## Module Structure
//!
//! - [`commands`] - EditCommand enum defining all reversible operations
//! - [`messages`] - Edit, undo and redo requests
//! - [`command_history`] - CommandHistory resource for tracking state
//! - [`execute`] - Forward, undo and redo application
//! - [`systems`] - Bevy systems for requests and keyboard shortcuts

mod command_history;
mod commands;
mod execute;
mod messages;
mod systems;

#[cfg(test)]
mod tests;

pub use command_history::CommandHistory;
pub use messages::{EditRequest, RedoRequest, UndoRequest};

use bevy::prelude::*;

use crate::conditions::no_dialog_open;
use crate::config::AppConfig;

pub struct HistoryPlugin;

impl Plugin for HistoryPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CommandHistory>()
            .add_message::<EditRequest>()
            .add_message::<UndoRequest>()
            .add_message::<RedoRequest>()
            .add_systems(
                Update,
                (
                    systems::sync_history_depth.run_if(resource_changed::<AppConfig>),
                    systems::clear_history_on_switch,
                    systems::handle_undo_redo_shortcuts.run_if(no_dialog_open),
                    systems::apply_edit_requests.run_if(on_message::<EditRequest>),
                    systems::undo_system.run_if(on_message::<UndoRequest>),
                    systems::redo_system.run_if(on_message::<RedoRequest>),
                )
                    .chain(),
            );
    }
}
