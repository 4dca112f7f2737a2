//! Collection open system and task polling.

use bevy::prelude::*;
use bevy::tasks::IoTaskPool;
use futures_lite::future;
use std::collections::BTreeSet;

use crate::common::StatusMessage;
use crate::config::{AddRecentFileRequest, LabelKind, RegisterLabelsRequest};

use super::messages::{DocumentSwitched, OpenCollectionRequest};
use super::resources::{AsyncCollectionOperation, CollectionLoadError, LoadResult, OpenCollectionTask};
use super::state::DocumentNavigator;
use super::store::JsonlStore;

/// Starts an async open (file read and parsing only)
pub fn open_collection_system(
    mut commands: Commands,
    mut events: MessageReader<OpenCollectionRequest>,
    mut async_op: ResMut<AsyncCollectionOperation>,
) {
    for event in events.read() {
        if async_op.is_busy() {
            warn!("Open already in progress, ignoring {:?}", event.path);
            continue;
        }

        let path = event.path.clone();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("collection")
            .to_string();

        async_op.is_loading = true;
        async_op.operation_description = Some(format!("Loading {}...", file_name));

        let task_pool = IoTaskPool::get();
        let task = task_pool.spawn(async move {
            let store = JsonlStore::open(&path);
            LoadResult { path, store }
        });

        commands.spawn(OpenCollectionTask(task));
    }
}

/// Polls open tasks and installs the collection once parsed
#[allow(clippy::too_many_arguments)]
pub fn poll_open_tasks(
    mut commands: Commands,
    mut tasks: Query<(Entity, &mut OpenCollectionTask)>,
    mut async_op: ResMut<AsyncCollectionOperation>,
    mut navigator: ResMut<DocumentNavigator>,
    mut load_error: ResMut<CollectionLoadError>,
    mut status: ResMut<StatusMessage>,
    mut recent_events: MessageWriter<AddRecentFileRequest>,
    mut label_events: MessageWriter<RegisterLabelsRequest>,
    mut switched_events: MessageWriter<DocumentSwitched>,
) {
    for (entity, mut task) in tasks.iter_mut() {
        let Some(result) = future::block_on(future::poll_once(&mut task.0)) else {
            continue;
        };
        commands.entity(entity).despawn();

        async_op.is_loading = false;
        async_op.operation_description = None;
        load_error.message = None;

        let store = match result.store {
            Ok(store) => store,
            Err(e) => {
                error!("Failed to open {:?}: {}", result.path, e);
                status.error(format!("Could not open {}", result.path.display()));
                load_error.message = Some(e.to_string());
                continue;
            }
        };

        let (entity_labels, relation_labels) = collect_labels(&store);
        let skipped = store.skipped_lines();
        let count = store.len();

        if let Err(e) = navigator.open(store) {
            error!("Failed to open {:?}: {}", result.path, e);
            load_error.message = Some(e.to_string());
            continue;
        }

        info!("Opened {:?} with {} documents", result.path, count);
        if skipped > 0 {
            status.warning(format!(
                "Loaded {} documents ({} malformed line(s) skipped)",
                count, skipped
            ));
        } else {
            status.success(format!("Loaded {} documents", count));
        }

        recent_events.write(AddRecentFileRequest {
            path: result.path.clone(),
        });
        label_events.write(RegisterLabelsRequest {
            kind: LabelKind::Entity,
            labels: entity_labels,
        });
        label_events.write(RegisterLabelsRequest {
            kind: LabelKind::Relation,
            labels: relation_labels,
        });
        switched_events.write(DocumentSwitched);
    }
}

/// Distinct entity and relation labels used anywhere in the collection
pub(super) fn collect_labels(store: &JsonlStore) -> (Vec<String>, Vec<String>) {
    let mut entities = BTreeSet::new();
    let mut relations = BTreeSet::new();
    for document in store.documents() {
        entities.extend(document.entity_labels());
        relations.extend(document.relation_labels());
    }
    (
        entities.into_iter().map(String::from).collect(),
        relations.into_iter().map(String::from).collect(),
    )
}
