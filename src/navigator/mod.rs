//! Collection storage and movement between documents.
//!
//! A collection is one line-delimited JSON file. It is read on a background
//! task, held in memory by a [`JsonlStore`], and walked one document at a time
//! by the [`DocumentNavigator`], which owns the working copy being edited.
//!
//! ## Module Structure
//!
//! - [`store`] - `DocumentStore` contract, `JsonlStore` and `StoreError`
//! - [`state`] - `DocumentNavigator` resource
//! - [`stats`] - Collection-wide counts for the statistics window
//! - [`messages`] - Open, save and navigation requests
//! - [`resources`] - Error, async and confirmation state
//! - [`load`] - Background open and task polling
//! - [`save`] - Synchronous save
//! - [`navigation`] - Navigation requests and shortcuts

mod load;
mod messages;
mod navigation;
mod resources;
mod save;
mod state;
mod stats;
mod store;


pub use messages::{DocumentSwitched, NavigateRequest, OpenCollectionRequest, SaveCollectionRequest};
pub use resources::{
    AfterSave, AsyncCollectionOperation, CollectionLoadError, CollectionSaveError,
    UnsavedChangesDialog,
};
pub use state::DocumentNavigator;
pub use stats::CollectionStats;

use bevy::prelude::*;

use crate::conditions::no_dialog_open;

pub struct NavigatorPlugin;

impl Plugin for NavigatorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DocumentNavigator>()
            .init_resource::<CollectionLoadError>()
            .init_resource::<CollectionSaveError>()
            .init_resource::<AsyncCollectionOperation>()
            .init_resource::<UnsavedChangesDialog>()
            .init_resource::<AfterSave>()
            .add_message::<OpenCollectionRequest>()
            .add_message::<SaveCollectionRequest>()
            .add_message::<NavigateRequest>()
            .add_message::<DocumentSwitched>()
            .add_systems(
                Update,
                (
                    navigation::handle_navigation_shortcuts.run_if(no_dialog_open),
                    // Save before any open or switch queued in the same frame
                    save::save_collection_system.run_if(on_message::<SaveCollectionRequest>),
                    load::open_collection_system.run_if(on_message::<OpenCollectionRequest>),
                    load::poll_open_tasks,
                    navigation::navigate_system.run_if(on_message::<NavigateRequest>),
                )
                    .chain(),
            );
    }
}
