//! Edit command enum for undo/redo operations.

use crate::annotation::{EntityRemoval, NamedEntity, Relation, TokenRemoval};

/// A reversible edit to the active document
#[derive(Clone, Debug, PartialEq)]
pub enum EditCommand {
    /// An entity was created, or an existing span was relabelled
    AddEntity {
        entity: NamedEntity,
        /// Label the span had before, when it was relabelled
        previous_label: Option<String>,
    },
    /// A relation was created, or an existing one was relabelled
    AddRelation {
        relation: Relation,
        previous_label: Option<String>,
    },
    /// An entity and every relation touching it were deleted
    DeleteEntity { removal: EntityRemoval },
    /// Tokens were deleted and the document renumbered
    DeleteTokens { removal: TokenRemoval },
}

impl EditCommand {
    /// Short human-readable summary for the status bar
    pub fn description(&self) -> String {
        match self {
            EditCommand::AddEntity {
                entity,
                previous_label: None,
            } => format!("add entity {} [{}]", entity.label, entity.span),
            EditCommand::AddEntity {
                entity,
                previous_label: Some(previous),
            } => format!("relabel entity [{}] {} -> {}", entity.span, previous, entity.label),
            EditCommand::AddRelation {
                relation,
                previous_label: None,
            } => format!("add relation {} ({})", relation.label, relation.key()),
            EditCommand::AddRelation {
                relation,
                previous_label: Some(previous),
            } => format!(
                "relabel relation ({}) {} -> {}",
                relation.key(),
                previous,
                relation.label
            ),
            EditCommand::DeleteEntity { removal } => format!(
                "delete entity {} [{}] and {} relation(s)",
                removal.entity.value.label,
                removal.entity.value.span,
                removal.relations.len()
            ),
            EditCommand::DeleteTokens { removal } => {
                format!("delete {} token(s)", removal.processed())
            }
        }
    }
}
