//! Command history resource for tracking undo/redo state.

use bevy::prelude::*;
use std::collections::VecDeque;

use crate::annotation::Document;
use crate::constants::{MAX_UNDO_HISTORY, MAX_UNDO_HISTORY_LIMIT};

use super::commands::EditCommand;
use super::execute::{execute_redo, execute_undo, UndoOutcome};

/// Bounded undo/redo journal for the active document
#[derive(Resource)]
pub struct CommandHistory {
    /// Commands that can be undone (most recent last)
    undo_stack: VecDeque<EditCommand>,
    /// Commands that can be redone (most recent last)
    redo_stack: Vec<EditCommand>,
    max_depth: usize,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::with_max_depth(MAX_UNDO_HISTORY)
    }
}

impl CommandHistory {
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_depth: max_depth.clamp(1, MAX_UNDO_HISTORY_LIMIT),
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Change the depth limit, evicting the oldest commands if needed
    pub fn set_max_depth(&mut self, max_depth: usize) {
        self.max_depth = max_depth.clamp(1, MAX_UNDO_HISTORY_LIMIT);
        self.trim();
    }

    fn trim(&mut self) {
        while self.undo_stack.len() > self.max_depth {
            self.undo_stack.pop_front();
        }
    }

    /// Push a new command to the history
    pub fn push(&mut self, command: EditCommand) {
        // A new edit invalidates everything that was undone
        self.redo_stack.clear();
        self.undo_stack.push_back(command);
        self.trim();
    }

    /// Pop the last command for undo
    pub fn pop_undo(&mut self) -> Option<EditCommand> {
        self.undo_stack.pop_back()
    }

    /// Pop the last command for redo
    pub fn pop_redo(&mut self) -> Option<EditCommand> {
        self.redo_stack.pop()
    }

    /// Push a command to the redo stack (used after undo)
    pub fn push_redo(&mut self, command: EditCommand) {
        self.redo_stack.push(command);
    }

    /// Push a command to the undo stack (used after redo)
    pub fn push_undo(&mut self, command: EditCommand) {
        self.undo_stack.push_back(command);
        self.trim();
    }

    /// Undo the most recent command against `document`.
    ///
    /// Returns the description of what was undone, or `None` when the
    /// undo stack is empty.
    pub fn undo(&mut self, document: &mut Document) -> Option<(String, UndoOutcome)> {
        let command = self.pop_undo()?;
        let outcome = execute_undo(&command, document);
        let description = command.description();
        self.push_redo(command);
        Some((description, outcome))
    }

    /// Redo the most recently undone command against `document`
    pub fn redo(&mut self, document: &mut Document) -> Option<String> {
        let command = self.pop_redo()?;
        match execute_redo(&command, document) {
            Some(reapplied) => {
                let description = reapplied.description();
                self.push_undo(reapplied);
                Some(description)
            }
            None => {
                warn!("Nothing left to redo for: {}", command.description());
                None
            }
        }
    }

    /// Check if there are commands to undo
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if there are commands to redo
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get the count of undoable commands
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the count of redoable commands
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Clear all history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
