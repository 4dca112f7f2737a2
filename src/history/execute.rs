//! Forward application, undo and redo of edit commands against a document.

use bevy::prelude::*;
use std::collections::BTreeSet;

use crate::annotation::{Document, NamedEntity, Relation, RestoreReport};

use super::commands::EditCommand;
use super::messages::EditRequest;

/// What an undo did, beyond the command moving to the redo stack
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UndoOutcome {
    /// Set when a token deletion could not be fully restored
    pub unresolved: Option<RestoreReport>,
}

/// Apply a requested edit and return the command that records it.
///
/// Returns `None` when the request changed nothing.
pub fn apply_edit(request: &EditRequest, document: &mut Document) -> Option<EditCommand> {
    match request {
        EditRequest::AddEntity { span, label } => {
            let previous_label = document.add_entity(*span, label.as_str());
            if previous_label.as_deref() == Some(label.as_str()) {
                return None;
            }
            Some(EditCommand::AddEntity {
                entity: NamedEntity::new(*span, label.as_str()),
                previous_label,
            })
        }
        EditRequest::AddRelation {
            source,
            target,
            label,
        } => {
            let previous_label = document.add_relation(*source, *target, label.as_str());
            if previous_label.as_deref() == Some(label.as_str()) {
                return None;
            }
            Some(EditCommand::AddRelation {
                relation: Relation::new(*source, *target, label.as_str()),
                previous_label,
            })
        }
        EditRequest::DeleteEntity { span } => document
            .delete_entity_cascade(*span)
            .map(|removal| EditCommand::DeleteEntity { removal }),
        EditRequest::DeleteTokens { span } => {
            let indices: BTreeSet<usize> = span.indices().collect();
            let removal = document.delete_token_range(&indices);
            (!removal.is_empty()).then_some(EditCommand::DeleteTokens { removal })
        }
    }
}

/// Apply the inverse of `command`
pub fn execute_undo(command: &EditCommand, document: &mut Document) -> UndoOutcome {
    match command {
        EditCommand::AddEntity {
            entity,
            previous_label,
        } => {
            match previous_label {
                Some(previous) => {
                    document.relabel_entity(entity.span, previous);
                }
                None => {
                    document.remove_entity(entity.span);
                }
            }
            UndoOutcome::default()
        }
        EditCommand::AddRelation {
            relation,
            previous_label,
        } => {
            match previous_label {
                Some(previous) => {
                    document.relabel_relation(relation.key(), previous);
                }
                None => {
                    document.remove_relation(relation.source, relation.target);
                }
            }
            UndoOutcome::default()
        }
        EditCommand::DeleteEntity { removal } => {
            document.restore_entity_removal(removal);
            UndoOutcome::default()
        }
        EditCommand::DeleteTokens { removal } => {
            let report = document.restore_token_removal(removal);
            if !report.is_clean() {
                warn!(
                    "Token restore left {} entity and {} relation collision(s) unresolved",
                    report.skipped_entities.len(),
                    report.skipped_relations.len()
                );
            }
            UndoOutcome {
                unresolved: (!report.is_clean()).then_some(report),
            }
        }
    }
}

/// Re-apply `command` and return the command to push back on the undo stack.
///
/// Deletions are re-run, so the returned record reflects the document as it
/// is now. `None` means there was nothing left to redo.
pub fn execute_redo(command: &EditCommand, document: &mut Document) -> Option<EditCommand> {
    match command {
        EditCommand::AddEntity { entity, .. } => {
            let previous_label = document.add_entity(entity.span, entity.label.as_str());
            Some(EditCommand::AddEntity {
                entity: entity.clone(),
                previous_label,
            })
        }
        EditCommand::AddRelation { relation, .. } => {
            let previous_label =
                document.add_relation(relation.source, relation.target, relation.label.as_str());
            Some(EditCommand::AddRelation {
                relation: relation.clone(),
                previous_label,
            })
        }
        EditCommand::DeleteEntity { removal } => document
            .delete_entity_cascade(removal.entity.value.span)
            .map(|removal| EditCommand::DeleteEntity { removal }),
        EditCommand::DeleteTokens { removal } => {
            let removal = document.delete_token_range(&removal.deleted_indices());
            (!removal.is_empty()).then_some(EditCommand::DeleteTokens { removal })
        }
    }
}
