//! Collection save system.

use bevy::prelude::*;

use crate::common::StatusMessage;

use super::messages::{OpenCollectionRequest, SaveCollectionRequest};
use super::resources::{AfterSave, CollectionSaveError};
use super::state::DocumentNavigator;

/// Writes the collection synchronously; memory is untouched when it fails
pub fn save_collection_system(
    mut events: MessageReader<SaveCollectionRequest>,
    mut navigator: ResMut<DocumentNavigator>,
    mut save_error: ResMut<CollectionSaveError>,
    mut status: ResMut<StatusMessage>,
    mut after_save: ResMut<AfterSave>,
    mut open_events: MessageWriter<OpenCollectionRequest>,
    mut exit_events: MessageWriter<AppExit>,
) {
    // Several requests in one frame still mean one write
    if events.read().count() == 0 {
        return;
    }
    let follow_up = std::mem::take(&mut *after_save);

    let Some(path) = navigator.store().map(|store| store.path().to_path_buf()) else {
        status.info("Nothing to save");
        return;
    };

    match navigator.save_current() {
        Ok(()) => {
            save_error.message = None;
            status.success(format!("Saved {}", path.display()));

            if let Some(path) = follow_up.open {
                open_events.write(OpenCollectionRequest { path });
            }
            if follow_up.exit {
                info!("Exiting after save");
                exit_events.write(AppExit::Success);
            }
        }
        Err(e) => {
            error!("Save failed: {}", e);
            status.error("Save failed");
            save_error.message = Some(e.to_string());
        }
    }
}
