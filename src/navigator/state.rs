//! The open collection and the document being edited.

use bevy::prelude::*;

use crate::annotation::Document;

use super::stats::CollectionStats;
use super::store::{DocumentStore, JsonlStore, StoreError};

/// Tracks the open collection, the active position in it and the working
/// copy of the active document.
#[derive(Resource, Default)]
pub struct DocumentNavigator {
    store: Option<JsonlStore>,
    ids: Vec<String>,
    index: usize,
    current: Option<Document>,
    /// Edits exist that are not on disk yet
    unsaved: bool,
    /// Bumped whenever the working document changes or is replaced
    revision: u64,
}

impl DocumentNavigator {
    /// Take over a freshly loaded collection and show its first document
    pub fn open(&mut self, store: JsonlStore) -> Result<(), StoreError> {
        let ids = store.list_document_ids();
        let first = ids
            .first()
            .ok_or_else(|| StoreError::Empty(store.path().to_path_buf()))?;
        let document = store.load_document(first)?;

        self.ids = ids;
        self.index = 0;
        self.current = Some(document);
        self.store = Some(store);
        self.unsaved = false;
        self.revision += 1;
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.store.is_some()
    }

    pub fn store(&self) -> Option<&JsonlStore> {
        self.store.as_ref()
    }

    pub fn document(&self) -> Option<&Document> {
        self.current.as_ref()
    }

    /// Run `f` on the working document, marking it changed only when `f`
    /// reports a change by returning `Some`
    pub fn edit<R>(&mut self, f: impl FnOnce(&mut Document) -> Option<R>) -> Option<R> {
        let result = f(self.current.as_mut()?)?;
        self.unsaved = true;
        self.revision += 1;
        Some(result)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current.as_ref().map(|_| self.index)
    }

    /// 1-based position and total, for display
    pub fn progress(&self) -> Option<(usize, usize)> {
        self.current_index().map(|i| (i + 1, self.ids.len()))
    }

    pub fn find_index(&self, id: &str) -> Option<usize> {
        self.ids.iter().position(|candidate| candidate == id)
    }

    /// Switch to the document at `index`, clamped to the collection.
    ///
    /// The working copy is staged back into the store first so edits
    /// survive navigation. Returns whether the active document changed.
    pub fn go_to(&mut self, index: usize) -> Result<bool, StoreError> {
        let Some(store) = self.store.as_mut() else {
            return Ok(false);
        };
        if self.ids.is_empty() {
            return Ok(false);
        }
        let index = index.min(self.ids.len() - 1);
        if self.current.is_some() && index == self.index {
            return Ok(false);
        }

        if let Some(current) = &self.current {
            store.stage(current)?;
        }
        let document = store.load_document(&self.ids[index])?;
        debug!("Switched to document {} ({})", index + 1, document.id);

        self.index = index;
        self.current = Some(document);
        self.revision += 1;
        Ok(true)
    }

    /// Move by `delta` documents, saturating at both ends
    pub fn jump(&mut self, delta: isize) -> Result<bool, StoreError> {
        let target = self.index.saturating_add_signed(delta);
        self.go_to(target)
    }

    pub fn next(&mut self) -> Result<bool, StoreError> {
        self.jump(1)
    }

    pub fn previous(&mut self) -> Result<bool, StoreError> {
        self.jump(-1)
    }

    pub fn first(&mut self) -> Result<bool, StoreError> {
        self.go_to(0)
    }

    pub fn last(&mut self) -> Result<bool, StoreError> {
        self.go_to(self.ids.len().saturating_sub(1))
    }

    /// Write the collection, including the working copy, to disk.
    ///
    /// On failure nothing in memory changes.
    pub fn save_current(&mut self) -> Result<(), StoreError> {
        let (Some(store), Some(current)) = (self.store.as_mut(), self.current.as_ref()) else {
            return Ok(());
        };
        store.save_document(current)?;
        self.unsaved = false;
        Ok(())
    }

    /// Statistics over the collection with the working copy substituted in
    pub fn statistics(&self) -> Option<CollectionStats> {
        let store = self.store.as_ref()?;
        let current = self.current.as_ref();
        Some(CollectionStats::from_documents(store.documents().iter().map(
            |document| match current {
                Some(current) if current.id == document.id => current,
                _ => document,
            },
        )))
    }
}
