//! Message types for edits and undo/redo.

use bevy::prelude::*;

use crate::annotation::Span;

/// A mutation the user asked for, applied and journaled in one place
#[derive(Message, Debug, Clone, PartialEq)]
pub enum EditRequest {
    AddEntity { span: Span, label: String },
    AddRelation { source: Span, target: Span, label: String },
    DeleteEntity { span: Span },
    DeleteTokens { span: Span },
}

#[derive(Message)]
pub struct UndoRequest;

#[derive(Message)]
pub struct RedoRequest;
