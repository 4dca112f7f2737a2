//! Resource types for collection I/O state tracking.

use bevy::prelude::*;
use bevy::tasks::Task;
use std::path::PathBuf;

use super::store::{JsonlStore, StoreError};

/// Error from the last collection open, shown until dismissed
#[derive(Resource, Default)]
pub struct CollectionLoadError {
    pub message: Option<String>,
}

/// Error from the last save, shown until dismissed
#[derive(Resource, Default)]
pub struct CollectionSaveError {
    pub message: Option<String>,
}

/// Tracks the background collection open for the modal notice
#[derive(Resource, Default)]
pub struct AsyncCollectionOperation {
    pub is_loading: bool,
    /// Description of the current operation
    pub operation_description: Option<String>,
}

impl AsyncCollectionOperation {
    pub fn is_busy(&self) -> bool {
        self.is_loading
    }
}

/// Result of reading and parsing a collection off the main thread
pub struct LoadResult {
    pub path: PathBuf,
    pub store: Result<JsonlStore, StoreError>,
}

/// Component for the open task
#[derive(Component)]
pub struct OpenCollectionTask(pub Task<LoadResult>);

/// Confirmation state for actions that would drop unsaved edits
#[derive(Resource, Default)]
pub struct UnsavedChangesDialog {
    /// Collection to open once the user confirms
    pub pending_open: Option<PathBuf>,
    /// Show the dialog for closing the app
    pub show_close_confirmation: bool,
}

/// Follow-up to run once the next save succeeds
#[derive(Resource, Default)]
pub struct AfterSave {
    pub open: Option<PathBuf>,
    pub exit: bool,
}

impl UnsavedChangesDialog {
    pub fn is_open(&self) -> bool {
        self.pending_open.is_some() || self.show_close_confirmation
    }
}
